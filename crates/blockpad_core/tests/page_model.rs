use blockpad_core::model::block::GridError;
use blockpad_core::model::seed::{welcome_page, WELCOME_PAGE_TITLE};
use blockpad_core::{Block, BlockBody, BlockKind, Page, PageError, SplitOutcome};
use std::collections::HashSet;

fn page_of(kinds_and_text: &[(BlockKind, &str)]) -> Page {
    let blocks = kinds_and_text
        .iter()
        .map(|(kind, text)| Block::with_text(*kind, *text))
        .collect();
    Page::with_blocks("Test", "📄", blocks, 1_000)
}

fn ids(page: &Page) -> Vec<blockpad_core::BlockId> {
    page.blocks.iter().map(|block| block.id).collect()
}

#[test]
fn deleting_the_only_block_is_refused() {
    let mut page = Page::new("📄", 1_000);
    let only = page.blocks[0].id;
    let before = page.clone();

    assert_eq!(page.delete_block(only), Err(PageError::LastBlock(only)));
    assert_eq!(page, before);
}

#[test]
fn delete_focus_target_is_previous_block_or_new_first() {
    let mut page = page_of(&[
        (BlockKind::Text, "a"),
        (BlockKind::Text, "b"),
        (BlockKind::Text, "c"),
    ]);
    let [a, b, c] = [page.blocks[0].id, page.blocks[1].id, page.blocks[2].id];

    assert_eq!(page.delete_block(c).unwrap(), b);
    assert_eq!(page.delete_block(a).unwrap(), b);
    assert_eq!(ids(&page), vec![b]);
}

#[test]
fn split_bullet_keeps_kind_and_text_halves() {
    let mut page = page_of(&[
        (BlockKind::Heading1, "title"),
        (BlockKind::Bullet, "buy milk"),
        (BlockKind::Text, "after"),
    ]);
    let bullet = page.blocks[1].id;

    let SplitOutcome::Split { new_block } = page.split_block(bullet, 4).unwrap() else {
        panic!("non-empty bullet must split");
    };

    assert_eq!(page.blocks.len(), 4);
    assert_eq!(page.blocks[1].id, bullet);
    assert_eq!(page.blocks[2].id, new_block);
    assert_eq!(page.blocks[1].kind(), BlockKind::Bullet);
    assert_eq!(page.blocks[2].kind(), BlockKind::Bullet);
    let joined = format!(
        "{}{}",
        page.blocks[1].text().unwrap(),
        page.blocks[2].text().unwrap()
    );
    assert_eq!(joined, "buy milk");
    assert_eq!(page.blocks[3].text(), Some("after"));
}

#[test]
fn split_of_heading_continues_as_text() {
    let mut page = page_of(&[(BlockKind::Heading2, "Section")]);
    let heading = page.blocks[0].id;
    page.split_block(heading, 7).unwrap();
    assert_eq!(page.blocks[1].kind(), BlockKind::Text);
    assert_eq!(page.blocks[1].text(), Some(""));
}

#[test]
fn split_of_empty_bullet_exits_list() {
    let mut page = page_of(&[(BlockKind::Text, "intro"), (BlockKind::Bullet, "")]);
    let bullet = page.blocks[1].id;

    assert_eq!(page.split_block(bullet, 0).unwrap(), SplitOutcome::ExitedList);
    assert_eq!(page.blocks.len(), 2);
    assert_eq!(page.blocks[1].id, bullet);
    assert_eq!(page.blocks[1].kind(), BlockKind::Text);
}

#[test]
fn split_counts_characters_not_bytes() {
    let mut page = page_of(&[(BlockKind::Text, "héllo wörld")]);
    let id = page.blocks[0].id;
    page.split_block(id, 5).unwrap();
    assert_eq!(page.blocks[0].text(), Some("héllo"));
    assert_eq!(page.blocks[1].text(), Some(" wörld"));
}

#[test]
fn reorder_preserves_ids_and_lands_on_target_index() {
    let mut page = page_of(&[
        (BlockKind::Text, "0"),
        (BlockKind::Text, "1"),
        (BlockKind::Text, "2"),
        (BlockKind::Text, "3"),
        (BlockKind::Text, "4"),
    ]);
    let original: HashSet<_> = ids(&page).into_iter().collect();

    // Moving down: target index shifts left by one after removal.
    let from = page.blocks[1].id;
    let to = page.blocks[3].id;
    let index = page.reorder(from, to).unwrap();
    assert_eq!(index, 2);
    assert_eq!(page.blocks[index].id, from);

    // Moving up: target index is unaffected by removal.
    let from = page.blocks[4].id;
    let to = page.blocks[0].id;
    let index = page.reorder(from, to).unwrap();
    assert_eq!(index, 0);
    assert_eq!(page.blocks[0].id, from);

    assert_eq!(page.blocks.len(), 5);
    assert_eq!(ids(&page).into_iter().collect::<HashSet<_>>(), original);
}

#[test]
fn reorder_with_unknown_target_leaves_page_unchanged() {
    let mut page = page_of(&[(BlockKind::Text, "a"), (BlockKind::Text, "b")]);
    let before = page.clone();
    let stranger = blockpad_core::model::id::new_id();
    assert_eq!(
        page.reorder(page.blocks[0].id, stranger),
        Err(PageError::BlockNotFound(stranger))
    );
    assert_eq!(page, before);
}

#[test]
fn change_type_to_divider_clears_content_and_back_is_empty() {
    let mut page = page_of(&[(BlockKind::Quote, "wise words")]);
    let id = page.blocks[0].id;

    assert!(page.change_type(id, BlockKind::Divider).unwrap());
    assert_eq!(page.blocks[0].body, BlockBody::Divider);
    assert!(page.change_type(id, BlockKind::Text).unwrap());
    assert_eq!(page.blocks[0].text(), Some(""));
    assert!(!page.change_type(id, BlockKind::Text).unwrap());
}

#[test]
fn change_type_keeps_text_across_text_kinds() {
    let mut page = page_of(&[(BlockKind::Text, "keep me")]);
    let id = page.blocks[0].id;
    page.change_type(id, BlockKind::Checkbox).unwrap();
    assert_eq!(
        page.blocks[0].body,
        BlockBody::Checkbox {
            text: "keep me".to_string(),
            checked: false
        }
    );
    page.change_type(id, BlockKind::Code).unwrap();
    assert_eq!(page.blocks[0].text(), Some("keep me"));
}

#[test]
fn table_materializes_on_first_render_not_on_type_change() {
    let mut page = page_of(&[(BlockKind::Text, "grid")]);
    let id = page.blocks[0].id;
    page.change_type(id, BlockKind::Table).unwrap();
    assert_eq!(page.blocks[0].body, BlockBody::Table(None));

    assert!(page.materialize_table(id).unwrap());
    assert!(!page.materialize_table(id).unwrap());
    let BlockBody::Table(Some(grid)) = &page.blocks[0].body else {
        panic!("table must hold a grid after materializing");
    };
    assert_eq!((grid.row_count(), grid.column_count()), (3, 3));
}

#[test]
fn table_never_shrinks_below_one_by_one() {
    let mut page = page_of(&[(BlockKind::Table, "")]);
    let id = page.blocks[0].id;
    page.materialize_table(id).unwrap();

    page.remove_row(id).unwrap();
    page.remove_row(id).unwrap();
    let before = page.clone();
    assert_eq!(
        page.remove_row(id),
        Err(PageError::Grid {
            block_id: id,
            source: GridError::LastRow
        })
    );
    assert_eq!(page, before);

    page.remove_column(id).unwrap();
    page.remove_column(id).unwrap();
    assert!(matches!(
        page.remove_column(id),
        Err(PageError::Grid {
            source: GridError::LastColumn,
            ..
        })
    ));

    let BlockBody::Table(Some(grid)) = &page.blocks[0].body else {
        panic!("grid expected");
    };
    assert_eq!((grid.row_count(), grid.column_count()), (1, 1));
}

#[test]
fn table_growth_keeps_grid_rectangular() {
    let mut page = page_of(&[(BlockKind::Table, "")]);
    let id = page.blocks[0].id;
    page.add_row(id).unwrap();
    page.add_column(id).unwrap();
    page.set_cell(id, 3, 3, "corner").unwrap();

    let BlockBody::Table(Some(grid)) = &page.blocks[0].body else {
        panic!("grid expected");
    };
    assert_eq!(grid.row_count(), 4);
    assert!(grid.rows().iter().all(|row| row.len() == 4));
    assert_eq!(grid.cell(3, 3), Some("corner"));
}

#[test]
fn toggle_checked_only_applies_to_checkboxes() {
    let mut page = page_of(&[(BlockKind::Checkbox, "task"), (BlockKind::Text, "note")]);
    let [task, note] = [page.blocks[0].id, page.blocks[1].id];

    assert!(page.toggle_checked(task).unwrap());
    assert!(!page.toggle_checked(task).unwrap());
    assert_eq!(page.toggle_checked(note), Err(PageError::NotCheckbox(note)));
}

#[test]
fn duplicate_inserts_copy_with_fresh_id_after_source() {
    let mut page = page_of(&[
        (BlockKind::Checkbox, "task"),
        (BlockKind::Text, "tail"),
    ]);
    let source = page.blocks[0].id;
    page.toggle_checked(source).unwrap();

    let copy = page.duplicate_block(source).unwrap();
    assert_ne!(copy, source);
    assert_eq!(page.blocks[1].id, copy);
    assert_eq!(page.blocks[1].body, page.blocks[0].body);
    assert_eq!(page.blocks[2].text(), Some("tail"));
}

#[test]
fn insert_after_none_appends() {
    let mut page = page_of(&[(BlockKind::Text, "first")]);
    let appended = page
        .insert_block_after(None, BlockBody::with_text(BlockKind::Numbered, "step"))
        .unwrap()
        .id;
    assert_eq!(page.blocks.last().unwrap().id, appended);

    let first = page.blocks[0].id;
    let middle = page
        .insert_block_after(Some(first), BlockBody::empty(BlockKind::Callout))
        .unwrap()
        .id;
    assert_eq!(page.blocks[1].id, middle);
}

#[test]
fn welcome_page_delete_divider_scenario() {
    let mut page = welcome_page(1_000);
    assert_eq!(page.title, WELCOME_PAGE_TITLE);
    let kinds: Vec<_> = page.blocks.iter().map(Block::kind).collect();
    assert_eq!(
        kinds,
        vec![
            BlockKind::Heading1,
            BlockKind::Text,
            BlockKind::Heading2,
            BlockKind::Bullet,
            BlockKind::Bullet,
            BlockKind::Bullet,
            BlockKind::Bullet,
            BlockKind::Divider,
            BlockKind::Checkbox,
            BlockKind::Checkbox,
            BlockKind::Quote,
            BlockKind::Callout,
        ]
    );

    let divider_index = kinds
        .iter()
        .position(|kind| *kind == BlockKind::Divider)
        .unwrap();
    let divider = page.blocks[divider_index].id;
    page.delete_block(divider).unwrap();

    assert_eq!(page.blocks.len(), 11);
    assert_eq!(page.blocks[divider_index].kind(), BlockKind::Checkbox);
}

#[test]
fn touch_never_moves_updated_at_backwards() {
    let mut page = Page::new("📄", 1_000);
    page.touch(5_000);
    page.touch(2_000);
    assert_eq!(page.updated_at, 5_000);
    assert_eq!(page.created_at, 1_000);
}
