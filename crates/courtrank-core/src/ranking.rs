// Ranking: players ordered by synthetic index, plus its CSV and preview forms.

use crate::pipeline::normalize::Normalization;
use serde::Serialize;
use std::fmt::Write as _;
use std::io::Write;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedPlayer {
    #[serde(rename = "Player")]
    pub player: String,
    #[serde(rename = "Synthetic_Index")]
    pub score: f64,
}

/// All players of one strategy, best first.
#[derive(Debug, Clone, PartialEq)]
pub struct Ranking {
    pub strategy: Normalization,
    pub entries: Vec<RankedPlayer>,
}

impl Ranking {
    /// Sort by score descending. Ties keep their input order.
    pub fn new(strategy: Normalization, players: &[String], scores: &[f64]) -> Ranking {
        let mut entries: Vec<RankedPlayer> = players
            .iter()
            .zip(scores)
            .map(|(player, &score)| RankedPlayer {
                player: player.clone(),
                score,
            })
            .collect();
        entries.sort_by(|a, b| b.score.total_cmp(&a.score));
        Ranking { strategy, entries }
    }

    pub fn top(&self, n: usize) -> &[RankedPlayer] {
        &self.entries[..n.min(self.entries.len())]
    }

    /// `Player,Synthetic_Index` rows, best first, no index column.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut wtr = csv::Writer::from_writer(writer);
        if self.entries.is_empty() {
            wtr.write_record(["Player", "Synthetic_Index"])?;
        }
        for entry in &self.entries {
            wtr.serialize(entry)?;
        }
        wtr.flush()?;
        Ok(())
    }

    /// Human-readable listing of the first `n` players. The heading counts
    /// the players actually listed.
    pub fn preview(&self, n: usize) -> String {
        let top = self.top(n);
        let width = top
            .iter()
            .map(|e| e.player.chars().count())
            .max()
            .unwrap_or(0)
            .max("Player".len());

        let mut out = format!("Top {} players ({}):\n", top.len(), self.strategy.label());
        let _ = writeln!(out, "{:>4}  {:<width$}  {:>15}", "#", "Player", "Synthetic_Index");
        for (i, entry) in top.iter().enumerate() {
            let _ = writeln!(
                out,
                "{:>4}  {:<width$}  {:>15.6}",
                i + 1,
                entry.player,
                entry.score
            );
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn sorted_descending() {
        let ranking = Ranking::new(
            Normalization::Unit,
            &names(&["A", "B", "C", "D", "E"]),
            &[0.3, 0.9, -0.2, 0.5, 0.9],
        );
        for pair in ranking.entries.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
        assert_eq!(ranking.entries.len(), 5);
    }

    #[test]
    fn ties_keep_input_order() {
        let ranking = Ranking::new(
            Normalization::Ratio,
            &names(&["First", "Second", "Third"]),
            &[0.5, 0.7, 0.5],
        );
        let order: Vec<_> = ranking.entries.iter().map(|e| e.player.as_str()).collect();
        assert_eq!(order, vec!["Second", "First", "Third"]);
    }

    #[test]
    fn top_is_clamped() {
        let ranking = Ranking::new(Normalization::Unit, &names(&["A", "B"]), &[1.0, 0.0]);
        assert_eq!(ranking.top(5).len(), 2);
        assert_eq!(ranking.top(1)[0].player, "A");
    }

    #[test]
    fn csv_has_header_and_no_index() {
        let ranking = Ranking::new(
            Normalization::Unit,
            &names(&["Low", "High"]),
            &[0.25, 0.75],
        );
        let mut buf = Vec::new();
        ranking.write_csv(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines, vec!["Player,Synthetic_Index", "High,0.75", "Low,0.25"]);
    }

    #[test]
    fn csv_quotes_names_with_commas() {
        let ranking = Ranking::new(Normalization::Unit, &names(&["Smith, Jr."]), &[1.0]);
        let mut buf = Vec::new();
        ranking.write_csv(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("\"Smith, Jr.\",1.0"));
    }

    #[test]
    fn empty_ranking_still_writes_header() {
        let ranking = Ranking::new(Normalization::Unit, &[], &[]);
        let mut buf = Vec::new();
        ranking.write_csv(&mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap().trim(), "Player,Synthetic_Index");
    }

    #[test]
    fn preview_lists_top_players() {
        let ranking = Ranking::new(
            Normalization::Standardization,
            &names(&["A", "B", "C", "D", "E", "F"]),
            &[0.1, 0.6, 0.2, 0.5, 0.4, 0.3],
        );
        let preview = ranking.preview(5);
        assert!(preview.starts_with("Top 5 players (standardization):"));
        // heading + column header + five rows
        assert_eq!(preview.lines().count(), 7);
        assert!(preview.contains("0.600000"));
        assert!(!preview.contains(" A "));
    }

    #[test]
    fn preview_heading_counts_listed_players() {
        let ranking = Ranking::new(Normalization::Unit, &names(&["A", "B"]), &[1.0, 0.0]);
        let preview = ranking.preview(5);
        assert!(preview.starts_with("Top 2 players (unit normalization):"));
        assert_eq!(preview.lines().count(), 4);
    }
}
