//! Hit testing in document coordinates.

use kurbo::{Point, Rect};

use crate::geometry::{intersects, square_around};
use crate::model::{BlockId, BlockItem, Group, GroupId, Page};
use crate::sizing::GroupSizer;

/// The topmost group containing `point`, skipping `hidden`.
pub fn group_at(page: &Page, point: Point, hidden: Option<GroupId>) -> Option<&Group> {
    page.groups()
        .iter()
        .rev()
        .filter(|g| Some(g.id()) != hidden)
        .find(|g| g.frame().contains(point))
}

/// The block under `point`, with its frame.
pub fn block_at(
    page: &Page,
    sizer: &GroupSizer,
    point: Point,
    editing: Option<&BlockItem>,
) -> Option<(BlockItem, Rect)> {
    let group = group_at(page, point, None)?;
    sizer
        .block_frames(group, editing)
        .into_iter()
        .find(|(_, frame)| frame.contains(point))
        .and_then(|(id, frame)| Some((group.block_item(id)?, frame)))
}

/// The block closest to `point` among those touching a square of side
/// `touch_size` around it, within the group under the point.
///
/// `hidden` is a group being dragged and is not a target; `excluding` lists
/// blocks that must not be returned.
pub fn closest_block(
    page: &Page,
    sizer: &GroupSizer,
    point: Point,
    touch_size: f64,
    hidden: Option<GroupId>,
    excluding: &[BlockId],
) -> Option<(BlockItem, Rect)> {
    let group = group_at(page, point, hidden)?;
    let touch = square_around(point, touch_size);
    sizer
        .block_frames(group, None)
        .into_iter()
        .filter(|(id, frame)| !excluding.contains(id) && intersects(*frame, touch))
        .min_by(|a, b| {
            let da = (a.1.center() - point).hypot();
            let db = (b.1.center() - point).hypot();
            da.total_cmp(&db)
        })
        .and_then(|(id, frame)| Some((group.block_item(id)?, frame)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Block, BlockFactory, BlockType};
    use uuid::Uuid;

    fn spacer(height: f64) -> Block {
        let mut block = BlockFactory::default().build(BlockType::Spacer);
        block.height = height;
        block
    }

    /// One group at the origin holding spacers of 40 and 30.
    fn page() -> (Page, Group) {
        let mut group = Group::new(Uuid::new_v4(), Rect::new(0.0, 0.0, 274.0, 106.0));
        group.add_block(spacer(40.0), None);
        group.add_block(spacer(30.0), None);
        let mut page = Page::default();
        page.add_group(group.clone());
        (page, group)
    }

    #[test]
    fn test_group_at() {
        let (page, group) = page();
        assert_eq!(group_at(&page, Point::new(10.0, 10.0), None).map(Group::id), Some(group.id()));
        assert!(group_at(&page, Point::new(10.0, 10.0), Some(group.id())).is_none());
        assert!(group_at(&page, Point::new(300.0, 10.0), None).is_none());
    }

    #[test]
    fn test_block_at() {
        let (page, group) = page();
        let sizer = GroupSizer::default();
        // second block spans y 58..88
        let (item, frame) = block_at(&page, &sizer, Point::new(100.0, 60.0), None).unwrap();
        assert_eq!(item.block_id(), group.blocks()[1].id());
        assert_eq!(frame, Rect::new(10.0, 58.0, 264.0, 88.0));
        // in the spacing between blocks
        assert!(block_at(&page, &sizer, Point::new(100.0, 54.0), None).is_none());
    }

    #[test]
    fn test_closest_block() {
        let (page, group) = page();
        let sizer = GroupSizer::default();
        let first = group.blocks()[0].id();
        let second = group.blocks()[1].id();

        let (item, _) =
            closest_block(&page, &sizer, Point::new(100.0, 54.0), 44.0, None, &[]).unwrap();
        assert_eq!(item.block_id(), second);

        let (item, _) =
            closest_block(&page, &sizer, Point::new(100.0, 54.0), 44.0, None, &[second]).unwrap();
        assert_eq!(item.block_id(), first);

        assert!(closest_block(&page, &sizer, Point::new(100.0, 54.0), 44.0, Some(group.id()), &[]).is_none());
    }
}
