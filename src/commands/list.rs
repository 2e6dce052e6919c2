// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! List command - shows algorithms, variants and fixtures

use crate::fixtures::FIXTURES;
use crate::selector::{Algorithm, Selection};
use anyhow::Result;
use serde::Serialize;

#[derive(Serialize)]
struct AlgorithmEntry {
    name: &'static str,
    variants: Vec<&'static str>,
    needs_goal: Vec<&'static str>,
    ignores_start: Vec<&'static str>,
    default_fixture: &'static str,
}

#[derive(Serialize)]
struct FixtureEntry {
    name: &'static str,
    description: &'static str,
}

#[derive(Serialize)]
struct Listing {
    algorithms: Vec<AlgorithmEntry>,
    fixtures: Vec<FixtureEntry>,
}

fn listing() -> Listing {
    let algorithms = Algorithm::ALL
        .iter()
        .map(|&algorithm| {
            let variants = algorithm.variant_names();
            let matching = |keep: fn(Selection) -> bool| -> Vec<&'static str> {
                variants
                    .iter()
                    .copied()
                    .filter(|v| Selection::parse(algorithm.name(), Some(*v)).is_ok_and(keep))
                    .collect()
            };
            let needs_goal = matching(Selection::requires_goal);
            let ignores_start = matching(|s| !s.uses_start());
            AlgorithmEntry {
                name: algorithm.name(),
                variants,
                needs_goal,
                ignores_start,
                default_fixture: algorithm.default_fixture(),
            }
        })
        .collect();
    let fixtures = FIXTURES
        .iter()
        .map(|&(name, description)| FixtureEntry { name, description })
        .collect();
    Listing {
        algorithms,
        fixtures,
    }
}

/// Run the list command
pub fn run(json: bool) -> Result<()> {
    let listing = listing();
    if json {
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    println!("Algorithms:");
    for entry in &listing.algorithms {
        let variants: Vec<String> = entry
            .variants
            .iter()
            .map(|v| {
                if entry.needs_goal.contains(v) {
                    format!("{v}*")
                } else if entry.ignores_start.contains(v) {
                    format!("{v}°")
                } else {
                    (*v).to_string()
                }
            })
            .collect();
        println!(
            "  {:<15} {}  [{}]",
            entry.name,
            variants.join(", "),
            entry.default_fixture
        );
    }
    println!("  (* needs --goal, or the fixture's default goal; ° runs over the whole graph and ignores --start)");
    println!();
    println!("Fixtures:");
    for fixture in &listing.fixtures {
        println!("  {:<19} {}", fixture.name, fixture.description);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_covers_every_algorithm() {
        let listing = listing();
        assert_eq!(listing.algorithms.len(), Algorithm::ALL.len());
        let bfs = &listing.algorithms[0];
        assert_eq!(bfs.name, "bfs");
        assert_eq!(bfs.needs_goal, vec!["shortest-path", "bidirectional"]);
        let astar = listing.algorithms.iter().find(|a| a.name == "astar").unwrap();
        assert_eq!(astar.needs_goal.len(), 4);
        assert!(astar.ignores_start.is_empty());
        assert_eq!(bfs.ignores_start, vec!["components"]);
        let kruskal = listing.algorithms.iter().find(|a| a.name == "kruskal").unwrap();
        assert_eq!(kruskal.ignores_start, vec!["standard"]);
        let floyd = listing.algorithms.iter().find(|a| a.name == "floyd-warshall").unwrap();
        assert_eq!(floyd.ignores_start, vec!["transitive-closure"]);
    }
}
