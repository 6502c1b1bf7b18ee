//! Subcommand handlers.

use chrono::{DateTime, Local, Utc};
use niro_core::{
    derive_preview, display_title, now_epoch_ms, EditSession, Note, NoteColor, NoteRepository,
    NoteService, NoteServiceError, SortMode, SummaryOutcome, Summarizer,
};
use std::error::Error;
use std::io::{self, BufRead, Read, Write};

type CommandResult = Result<(), Box<dyn Error>>;

/// Field changes requested on the command line. `None` keeps the current value.
pub struct DraftEdits {
    pub title: Option<String>,
    pub content: Option<String>,
    pub color: Option<NoteColor>,
}

pub fn list<R: NoteRepository>(
    service: &NoteService<R>,
    search: &str,
    sort: SortMode,
) -> CommandResult {
    let view = service.view(search, sort);
    if view.is_empty() {
        if service.notes().is_empty() {
            println!("No notes yet. Create one with `niro new --title <TITLE>`.");
        } else {
            println!("No notes match `{search}`.");
        }
        return Ok(());
    }

    for note in view {
        println!(
            "{}  [{}]  {}  ({})",
            note.id,
            note.color,
            display_title(note),
            format_date(note.last_modified)
        );
        let preview = derive_preview(&note.content);
        for line in preview.lines().filter(|line| !line.trim().is_empty()) {
            println!("    {line}");
        }
    }
    Ok(())
}

pub fn show<R: NoteRepository>(service: &NoteService<R>, id: &str) -> CommandResult {
    let note = find(service, id)?;
    println!("{}", display_title(note));
    println!("color:         {} ({})", note.color, note.color.hex());
    println!("created:       {}", format_timestamp(note.created_at));
    println!("last modified: {}", format_timestamp(note.last_modified));
    println!();
    println!("{}", note.content);
    Ok(())
}

pub async fn create<R: NoteRepository>(
    service: &mut NoteService<R>,
    edits: DraftEdits,
    summarizer: Option<&dyn Summarizer>,
) -> CommandResult {
    let mut session = EditSession::new_note();
    apply_edits(&mut session, edits)?;
    summarize_if_requested(&mut session, summarizer).await;

    match session.save(service, now_epoch_ms()) {
        Ok(note) => {
            println!("Created note {}.", note.id);
            Ok(())
        }
        Err(NoteServiceError::EmptyNote) => {
            println!("Nothing to save: a note needs a title or content.");
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

pub async fn edit<R: NoteRepository>(
    service: &mut NoteService<R>,
    id: &str,
    edits: DraftEdits,
    summarizer: Option<&dyn Summarizer>,
) -> CommandResult {
    let mut session = EditSession::edit(find(service, id)?);
    apply_edits(&mut session, edits)?;
    summarize_if_requested(&mut session, summarizer).await;

    if !session.is_dirty() {
        println!("No changes to save.");
        return Ok(());
    }

    match session.save(service, now_epoch_ms()) {
        Ok(note) => {
            println!("Saved note {}.", note.id);
            Ok(())
        }
        Err(NoteServiceError::EmptyNote) => {
            println!("Not saved: a note needs a title or content. Use `niro delete` to remove it.");
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

pub fn delete<R: NoteRepository>(
    service: &mut NoteService<R>,
    id: &str,
    yes: bool,
) -> CommandResult {
    let title = display_title(find(service, id)?).to_string();
    let prompt = format!("Delete \"{title}\"? This action cannot be undone. [y/N] ");
    if !yes && !confirm(&prompt)? {
        println!("Cancelled.");
        return Ok(());
    }

    service.delete(id)?;
    println!("Deleted \"{title}\".");
    Ok(())
}

pub fn colors() {
    for color in NoteColor::ALL {
        let marker = if color == NoteColor::default() {
            " (default)"
        } else {
            ""
        };
        println!("{:<8}{}{marker}", color.name(), color.hex());
    }
}

fn find<'a, R: NoteRepository>(
    service: &'a NoteService<R>,
    id: &str,
) -> Result<&'a Note, NoteServiceError> {
    service
        .get(id)
        .ok_or_else(|| NoteServiceError::NoteNotFound(id.to_string()))
}

fn apply_edits(session: &mut EditSession, edits: DraftEdits) -> io::Result<()> {
    let draft = session.draft_mut();
    if let Some(title) = edits.title {
        draft.title = title;
    }
    if let Some(content) = edits.content {
        draft.content = if content == "-" {
            read_stdin()?
        } else {
            content
        };
    }
    if let Some(color) = edits.color {
        draft.color = color;
    }
    Ok(())
}

async fn summarize_if_requested(
    session: &mut EditSession,
    summarizer: Option<&dyn Summarizer>,
) {
    let Some(summarizer) = summarizer else {
        return;
    };

    match session.summarize(summarizer).await {
        Ok(SummaryOutcome::Appended) => println!("AI summary appended."),
        Ok(SummaryOutcome::Skipped) => println!("Nothing to summarize: content is empty."),
        Err(err) if err.is_unavailable() => {
            eprintln!("Could not generate summary: set GEMINI_API_KEY to enable summaries.");
        }
        Err(err) => {
            eprintln!("Could not generate summary ({err}). The note content was left unchanged.");
        }
    }
}

fn read_stdin() -> io::Result<String> {
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    Ok(buffer.trim_end_matches(['\n', '\r']).to_string())
}

fn confirm(prompt: &str) -> io::Result<bool> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

fn to_local(epoch_ms: i64) -> Option<DateTime<Local>> {
    DateTime::<Utc>::from_timestamp_millis(epoch_ms).map(|utc| utc.with_timezone(&Local))
}

fn format_date(epoch_ms: i64) -> String {
    to_local(epoch_ms)
        .map(|dt| dt.format("%b %-d, %Y").to_string())
        .unwrap_or_else(|| epoch_ms.to_string())
}

fn format_timestamp(epoch_ms: i64) -> String {
    to_local(epoch_ms)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| epoch_ms.to_string())
}
