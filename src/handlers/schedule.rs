use chrono::{NaiveDate, NaiveTime};

use super::confirm;
use crate::models::{DayOfWeek, NewCalendarException, OperatingHour};
use crate::services::calendar_exceptions::CalendarExceptionsEditor;
use crate::services::operating_hours::OperatingHoursEditor;
use crate::state::AppState;

fn print_hour(hour: &OperatingHour) {
    match (hour.is_closed, hour.open_time, hour.close_time) {
        (true, _, _) => println!("{:<10} closed", hour.day_of_week),
        (false, Some(open), Some(close)) => println!(
            "{:<10} {}-{}",
            hour.day_of_week,
            open.format("%H:%M"),
            close.format("%H:%M")
        ),
        (false, _, _) => println!("{:<10} open, times not set", hour.day_of_week),
    }
}

pub enum HoursEdit {
    Show,
    Set {
        day: DayOfWeek,
        open: NaiveTime,
        close: NaiveTime,
    },
    Close(DayOfWeek),
    Open(DayOfWeek),
    Reset,
}

pub async fn hours(state: &AppState, court_id: i64, edit: HoursEdit) -> anyhow::Result<()> {
    let mut editor = OperatingHoursEditor::new(state.api.clone(), court_id);
    editor.load().await?;

    match edit {
        HoursEdit::Show => {
            if !editor.is_configured() {
                println!("(not configured yet, showing defaults)");
            }
        }
        HoursEdit::Set { day, open, close } => editor.set_times(day, open, close)?,
        HoursEdit::Close(day) => editor.set_closed(day, true),
        HoursEdit::Open(day) => editor.set_closed(day, false),
        HoursEdit::Reset => {
            editor.reset().await?;
            println!("Operating hours reset.");
        }
    }

    if editor.is_dirty() {
        editor.save().await?;
        println!("Operating hours saved.");
    }

    for hour in editor.hours() {
        print_hour(hour);
    }
    Ok(())
}

fn print_exceptions(editor: &CalendarExceptionsEditor) {
    let (start, end) = editor.range();
    println!("Exceptions {start} to {end}:");
    if editor.exceptions().is_empty() {
        println!("  none");
    }
    for ex in editor.exceptions() {
        let hours = match (ex.is_closed, ex.open_time, ex.close_time) {
            (true, _, _) => "closed".to_string(),
            (false, Some(open), Some(close)) => {
                format!("{}-{}", open.format("%H:%M"), close.format("%H:%M"))
            }
            (false, _, _) => "open".to_string(),
        };
        println!(
            "{:>4}  {}  {hours}  {}",
            ex.id,
            ex.date,
            ex.reason.as_deref().unwrap_or("")
        );
    }
}

async fn exceptions_editor(
    state: &AppState,
    court_id: i64,
    range: Option<(NaiveDate, NaiveDate)>,
) -> anyhow::Result<CalendarExceptionsEditor> {
    let mut editor = CalendarExceptionsEditor::starting_today(state.api.clone(), court_id);
    match range {
        Some((start, end)) => editor.set_range(start, end).await?,
        None => editor.load().await?,
    }
    Ok(editor)
}

pub async fn list_exceptions(
    state: &AppState,
    court_id: i64,
    range: Option<(NaiveDate, NaiveDate)>,
) -> anyhow::Result<()> {
    let editor = exceptions_editor(state, court_id, range).await?;
    print_exceptions(&editor);
    Ok(())
}

pub async fn add_exception(state: &AppState, court_id: i64, draft: NewCalendarException) -> anyhow::Result<()> {
    let mut editor = exceptions_editor(state, court_id, None).await?;
    editor.create(draft).await?;
    println!("Exception added.");
    print_exceptions(&editor);
    Ok(())
}

pub async fn remove_exception(
    state: &AppState,
    court_id: i64,
    exception_id: i64,
    assume_yes: bool,
    range: Option<(NaiveDate, NaiveDate)>,
) -> anyhow::Result<()> {
    let mut editor = exceptions_editor(state, court_id, range).await?;
    let removed = editor
        .delete(exception_id, |ex| {
            assume_yes || confirm(&format!("Delete the exception on {}?", ex.date))
        })
        .await?;

    if removed {
        println!("Exception removed.");
        print_exceptions(&editor);
    } else {
        println!("Kept.");
    }
    Ok(())
}
