//! Structural and content edits on the screenplay tree
//!
//! Each operation either applies fully or returns an [`EditError`] and leaves
//! the tree untouched. Invariants kept here: every scene has at least one row,
//! every page at least one scene, the document at least one page.

use crate::error::EditError;
use crate::models::{CellAddress, Document, Page, Row, Scene};
use crate::parse::PartialRow;

fn scene_mut(page: &mut Page, scene: usize) -> Result<&mut Scene, EditError> {
    page.scenes
        .get_mut(scene)
        .ok_or(EditError::SceneOutOfRange { scene })
}

/// Replace one cell's content; `Ok(false)` when the value was already equal
pub fn set_cell(page: &mut Page, address: CellAddress, value: &str) -> Result<bool, EditError> {
    let CellAddress {
        scene_index: scene,
        row_index: row,
        column_key,
    } = address;
    let target = scene_mut(page, scene)?
        .rows
        .get_mut(row)
        .ok_or(EditError::RowOutOfRange { scene, row })?;
    Ok(target.set(column_key, value))
}

/// Append an empty row to a scene; returns the new row index
pub fn append_row(page: &mut Page, scene: usize) -> Result<usize, EditError> {
    let scene = scene_mut(page, scene)?;
    scene.rows.push(Row::new());
    Ok(scene.rows.len() - 1)
}

/// Insert an empty row right after `row`; returns the new row index
pub fn insert_row_after(page: &mut Page, scene: usize, row: usize) -> Result<usize, EditError> {
    let target = scene_mut(page, scene)?;
    if row >= target.rows.len() {
        return Err(EditError::RowOutOfRange { scene, row });
    }
    target.rows.insert(row + 1, Row::new());
    Ok(row + 1)
}

/// Remove a row; the last row of a scene is never removed
pub fn delete_row(page: &mut Page, scene: usize, row: usize) -> Result<(), EditError> {
    let target = scene_mut(page, scene)?;
    if row >= target.rows.len() {
        return Err(EditError::RowOutOfRange { scene, row });
    }
    if target.rows.len() == 1 {
        return Err(EditError::LastRow);
    }
    target.rows.remove(row);
    Ok(())
}

/// Append a scene numbered `max + 1`; returns (index, number)
pub fn add_scene(page: &mut Page) -> (usize, u32) {
    let number = page.next_scene_number();
    page.scenes.push(Scene::new(number));
    (page.scenes.len() - 1, number)
}

/// Remove a scene; removing the only scene leaves a fresh scene 1
pub fn delete_scene(page: &mut Page, scene: usize) -> Result<(), EditError> {
    if scene >= page.scenes.len() {
        return Err(EditError::SceneOutOfRange { scene });
    }
    if page.scenes.len() == 1 {
        page.scenes[0] = Scene::new(1);
    } else {
        page.scenes.remove(scene);
    }
    Ok(())
}

pub fn set_collapsed(page: &mut Page, scene: usize, collapsed: bool) -> Result<(), EditError> {
    scene_mut(page, scene)?.collapsed = collapsed;
    Ok(())
}

/// Flip a scene's collapse state; returns the new state
pub fn toggle_collapsed(page: &mut Page, scene: usize) -> Result<bool, EditError> {
    let target = scene_mut(page, scene)?;
    target.collapsed = !target.collapsed;
    Ok(target.collapsed)
}

pub fn set_all_collapsed(page: &mut Page, collapsed: bool) {
    for scene in &mut page.scenes {
        scene.collapsed = collapsed;
    }
}

/// Append a page; returns its index
pub fn add_page(doc: &mut Document, name: impl Into<String>) -> usize {
    doc.pages.push(Page::new(name));
    doc.pages.len() - 1
}

pub fn delete_page(doc: &mut Document, page: usize) -> Result<(), EditError> {
    if page >= doc.pages.len() {
        return Err(EditError::PageOutOfRange { page });
    }
    if doc.pages.len() == 1 {
        return Err(EditError::OnlyPage);
    }
    doc.pages.remove(page);
    Ok(())
}

pub fn rename_page(doc: &mut Document, page: usize, name: &str) -> Result<(), EditError> {
    doc.pages
        .get_mut(page)
        .ok_or(EditError::PageOutOfRange { page })?
        .name = name.to_string();
    Ok(())
}

/// Merge the first pasted row into `target_row`, insert the rest after it
///
/// Returns the number of inserted rows (`rows.len() - 1`, or 0 for no rows).
pub fn apply_paste(
    page: &mut Page,
    scene: usize,
    target_row: usize,
    rows: &[PartialRow],
) -> Result<usize, EditError> {
    let target = scene_mut(page, scene)?;
    let existing = target
        .rows
        .get_mut(target_row)
        .ok_or(EditError::RowOutOfRange {
            scene,
            row: target_row,
        })?;

    let Some((first, rest)) = rows.split_first() else {
        return Ok(0);
    };
    first.merge_into(existing);

    let insert_at = target_row + 1;
    target
        .rows
        .splice(insert_at..insert_at, rest.iter().map(PartialRow::to_row));
    Ok(rest.len())
}
