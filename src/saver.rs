use log::info;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::render::solution_to_string;
use crate::search::SearchResult;

/// Writes the uncolored solution to `dir/result_<unix-millis>.txt`, creating
/// `dir` if needed. Returns the path written.
pub fn save_solution(result: &SearchResult, dir: &Path) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;

    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|err| io::Error::new(io::ErrorKind::Other, err))?
        .as_millis();
    let mut path = dir.join(format!("result_{millis}.txt"));
    let mut suffix = 1;
    while path.exists() {
        path = dir.join(format!("result_{millis}_{suffix}.txt"));
        suffix += 1;
    }

    fs::write(&path, report(result))?;
    info!("solution written to {}", path.display());
    Ok(path)
}

fn report(result: &SearchResult) -> String {
    let heuristic = result.heuristic().map_or("none", |h| h.name());
    let mut text = format!(
        "Algorithm: {}\nHeuristic: {}\n\n",
        result.algorithm(),
        heuristic
    );
    text.push_str(&solution_to_string(result, false));
    if let Some(cost) = result.cost() {
        text.push_str(&format!("\nMoves: {cost}\n"));
    }
    text.push_str(&format!("Nodes expanded: {}\n", result.nodes_expanded()));
    text
}
