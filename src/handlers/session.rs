use crate::db::queries;
use crate::models::User;
use crate::state::AppState;

pub fn set_token(state: &AppState, user: &User) -> anyhow::Result<()> {
    let db = state.db.lock().unwrap_or_else(|e| e.into_inner());
    queries::save_session(&db, user)?;
    println!("Session saved.");
    Ok(())
}

pub fn show(state: &AppState) -> anyhow::Result<()> {
    let db = state.db.lock().unwrap_or_else(|e| e.into_inner());
    match queries::load_session(&db)? {
        Some(user) => {
            let who = user
                .name
                .or(user.email)
                .unwrap_or_else(|| "unnamed user".to_string());
            println!("Signed in as {who}, token {}", mask(&user.token));
        }
        None => println!("No stored session."),
    }
    Ok(())
}

pub fn clear(state: &AppState) -> anyhow::Result<()> {
    let db = state.db.lock().unwrap_or_else(|e| e.into_inner());
    if queries::clear_session(&db)? {
        println!("Session cleared.");
    } else {
        println!("No stored session.");
    }
    Ok(())
}

fn mask(token: &str) -> String {
    let tail: String = token
        .chars()
        .rev()
        .take(4)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    format!("…{tail}")
}
