//! Derived read-only views: word counts, scene outline, character graph input

use std::collections::HashSet;

use serde::Serialize;

use crate::models::{ColumnKey, Document, Page, Scene};
use crate::text::markup::strip_html;

/// Outline entry for one scene
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SceneSummary {
    pub page_index: usize,
    pub scene_index: usize,
    pub number: u32,
    pub heading: String,
    pub row_count: usize,
    pub word_count: usize,
}

/// Words in one cell fragment
pub fn cell_word_count(html: &str) -> usize {
    if html.is_empty() {
        return 0;
    }
    strip_html(html).split_whitespace().count()
}

pub fn scene_word_count(scene: &Scene) -> usize {
    scene
        .rows
        .iter()
        .flat_map(|row| ColumnKey::ALL.into_iter().map(move |key| row.get(key)))
        .map(cell_word_count)
        .sum()
}

pub fn page_word_count(page: &Page) -> usize {
    page.scenes.iter().map(scene_word_count).sum()
}

pub fn word_count(doc: &Document) -> usize {
    doc.pages.iter().map(page_word_count).sum()
}

/// One summary per scene, in document order
pub fn outline(doc: &Document) -> Vec<SceneSummary> {
    doc.pages
        .iter()
        .enumerate()
        .flat_map(|(page_index, page)| {
            page.scenes
                .iter()
                .enumerate()
                .map(move |(scene_index, scene)| SceneSummary {
                    page_index,
                    scene_index,
                    number: scene.scene,
                    heading: scene
                        .rows
                        .iter()
                        .map(|row| strip_html(&row.heading).trim().to_string())
                        .find(|h| !h.is_empty())
                        .unwrap_or_default(),
                    row_count: scene.rows.len(),
                    word_count: scene_word_count(scene),
                })
        })
        .collect()
}

fn character_name(html: &str) -> Option<String> {
    let name = strip_html(html).trim().to_uppercase();
    (!name.is_empty()).then_some(name)
}

/// Distinct speaking characters in first-seen order
pub fn character_names(doc: &Document) -> Vec<String> {
    let mut seen = HashSet::new();
    doc.pages
        .iter()
        .flat_map(|p| p.scenes.iter())
        .flat_map(|s| s.rows.iter())
        .filter_map(|row| character_name(&row.character))
        .filter(|name| seen.insert(name.clone()))
        .collect()
}

/// Index pairs into `names` for characters sharing a scene, each pair once
pub fn character_pairs(doc: &Document, names: &[String]) -> Vec<(usize, usize)> {
    let mut pairs = Vec::new();
    let mut seen = HashSet::new();
    for scene in doc.pages.iter().flat_map(|p| p.scenes.iter()) {
        let mut present: Vec<usize> = scene
            .rows
            .iter()
            .filter_map(|row| character_name(&row.character))
            .filter_map(|name| names.iter().position(|n| *n == name))
            .collect();
        present.sort_unstable();
        present.dedup();
        for (i, a) in present.iter().enumerate() {
            for b in &present[i + 1..] {
                if seen.insert((*a, *b)) {
                    pairs.push((*a, *b));
                }
            }
        }
    }
    pairs
}
