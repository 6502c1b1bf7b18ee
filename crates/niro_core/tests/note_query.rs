use niro_core::{query_notes, Note, NoteColor, NoteDraft, SortMode};

fn note(id: &str, title: &str, content: &str, created_at: i64, last_modified: i64) -> Note {
    let mut note = Note::with_id(id, NoteDraft::new(title, content, NoteColor::Red), created_at);
    note.last_modified = last_modified;
    note
}

fn ids(view: &[&Note]) -> Vec<String> {
    view.iter().map(|n| n.id.clone()).collect()
}

fn sample() -> Vec<Note> {
    vec![
        note("a", "Banana", "yellow fruit", 10, 50),
        note("b", "apple", "say hello there", 30, 40),
        note("c", "Cherry", "", 20, 60),
    ]
}

#[test]
fn empty_term_returns_everything_in_mode_order() {
    let notes = sample();

    assert_eq!(
        ids(&query_notes(&notes, "", SortMode::LastModified)),
        ["c", "a", "b"]
    );
    assert_eq!(
        ids(&query_notes(&notes, "", SortMode::CreatedAt)),
        ["b", "c", "a"]
    );
    assert_eq!(ids(&query_notes(&notes, "", SortMode::Title)), ["b", "a", "c"]);
}

#[test]
fn default_sort_mode_is_last_modified() {
    assert_eq!(SortMode::default(), SortMode::LastModified);
}

#[test]
fn filter_is_case_insensitive_over_title_or_content() {
    let notes = sample();

    assert_eq!(
        ids(&query_notes(&notes, "HELLO", SortMode::LastModified)),
        ["b"]
    );
    assert_eq!(
        ids(&query_notes(&notes, "cherry", SortMode::LastModified)),
        ["c"]
    );
    assert!(query_notes(&notes, "durian", SortMode::Title).is_empty());
}

#[test]
fn title_sort_places_lowercase_apple_before_banana() {
    let notes = vec![
        note("1", "Banana", "", 1, 1),
        note("2", "apple", "", 1, 1),
    ];
    let view = query_notes(&notes, "", SortMode::Title);
    assert_eq!(view[0].title, "apple");
    assert_eq!(view[1].title, "Banana");
}

#[test]
fn ties_keep_input_order() {
    let notes = vec![
        note("first", "same", "", 5, 5),
        note("second", "Same", "", 5, 5),
        note("third", "same", "", 5, 5),
    ];

    for mode in [SortMode::LastModified, SortMode::CreatedAt, SortMode::Title] {
        assert_eq!(
            ids(&query_notes(&notes, "", mode)),
            ["first", "second", "third"],
            "mode {mode}"
        );
    }
}

#[test]
fn query_does_not_mutate_input() {
    let notes = sample();
    let before = notes.clone();
    let _ = query_notes(&notes, "a", SortMode::Title);
    assert_eq!(notes, before);
}
