//! Group repositioning.
//!
//! Groups whose horizontal extents overlap form a column. Within a column the
//! engine keeps groups apart vertically: new groups go below the column, moved
//! groups snap into a gap or are pushed above or below it, and a repack pass
//! pushes overlapping groups down.
//!
//! Columns are built by scanning the page's groups in order and dropping each
//! into the first bucket holding a group it overlaps horizontally. Bucket
//! membership therefore depends on page order, which is treated as canonical.

use kurbo::{Rect, Vec2};

use crate::geometry::{
    intersection, intersects, overlaps_horizontally, subtract_from_nearest_horizontal_side,
    union_all, with_min_y,
};
use crate::model::{Group, GroupId, Page};

/// The horizontal edge being dragged during a resize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizontalEdge {
    Left,
    Right,
}

/// A group's column, with the group itself left out.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnResult {
    /// Other members as `(id, frame)`, sorted by top edge.
    pub members: Vec<(GroupId, Rect)>,
    /// Bounding rectangle of the other members.
    pub bounds: Option<Rect>,
    /// Vertical gaps between consecutive members.
    pub gaps: Vec<Rect>,
    /// Whether the group intersects any other member.
    pub overlaps: bool,
}

impl ColumnResult {
    /// Find a gap the frame can move into.
    ///
    /// A gap qualifies when it intersects the frame and is at least as tall.
    /// The frame keeps its x and size.
    pub fn fit_in_gap(&self, frame: Rect, spacing: f64) -> Option<Rect> {
        self.gaps
            .iter()
            .find(|gap| intersects(**gap, frame) && gap.height() >= frame.height())
            .map(|gap| {
                if frame.y1 > gap.y1 {
                    with_min_y(frame, gap.y1 - frame.height() - spacing)
                } else {
                    with_min_y(frame, gap.y0 + spacing)
                }
            })
    }
}

/// Partition groups into columns, returning indices into `groups`.
pub fn column_buckets(groups: &[Group]) -> Vec<Vec<usize>> {
    let mut buckets: Vec<Vec<usize>> = Vec::new();
    for (i, group) in groups.iter().enumerate() {
        let frame = group.frame();
        let bucket = buckets.iter_mut().find(|bucket| {
            bucket
                .iter()
                .any(|&j| overlaps_horizontally(groups[j].frame(), frame))
        });
        match bucket {
            Some(bucket) => bucket.push(i),
            None => buckets.push(vec![i]),
        }
    }
    buckets
}

/// Empty vertical areas between consecutive frames sorted by top edge.
fn gaps_between(sorted: &[(GroupId, Rect)]) -> Vec<Rect> {
    sorted
        .windows(2)
        .map(|pair| {
            let (upper, lower) = (pair[0].1, pair[1].1);
            let height = (lower.y0 - upper.y1).max(0.0);
            Rect::new(
                upper.x0.min(lower.x0),
                upper.y1,
                upper.x1.max(lower.x1),
                upper.y1 + height,
            )
        })
        .collect()
}

/// Compute the column containing `target`. `None` when the group is not on the page.
pub fn find_group_column(groups: &[Group], target: GroupId) -> Option<ColumnResult> {
    let target_index = groups.iter().position(|g| g.id() == target)?;
    let target_frame = groups[target_index].frame();
    let bucket = column_buckets(groups)
        .into_iter()
        .find(|bucket| bucket.contains(&target_index))?;

    let mut members: Vec<(GroupId, Rect)> = bucket
        .into_iter()
        .filter(|&i| i != target_index)
        .map(|i| (groups[i].id(), groups[i].frame()))
        .collect();
    members.sort_by(|a, b| a.1.y0.total_cmp(&b.1.y0));

    let overlaps = members.iter().any(|(_, f)| intersects(*f, target_frame));
    let bounds = union_all(members.iter().map(|(_, f)| *f));
    let gaps = gaps_between(&members);
    Some(ColumnResult {
        members,
        bounds,
        gaps,
        overlaps,
    })
}

/// Places groups on a page so that groups sharing a column stay apart.
#[derive(Debug, Clone, Copy)]
pub struct Repositioner {
    spacing: f64,
}

impl Repositioner {
    /// Create a repositioner keeping `spacing` between groups in a column.
    pub fn new(spacing: f64) -> Self {
        Self { spacing }
    }

    pub fn spacing(&self) -> f64 {
        self.spacing
    }

    /// Place a newly added group directly below the rest of its column.
    pub fn reposition_added(&self, page: &mut Page, group_id: GroupId) {
        let Some(column) = find_group_column(page.groups(), group_id) else {
            return;
        };
        let (Some(bounds), Some(group)) = (column.bounds, page.group(group_id)) else {
            return;
        };
        let frame = with_min_y(group.frame(), bounds.y1 + self.spacing);
        log::trace!("placing added group {} at y={}", group_id, frame.y0);
        page.set_group_frame(group_id, frame);
    }

    /// Resolve a moved group's overlap with its column.
    ///
    /// Returns the shift applied to the whole page, which is non-zero only
    /// when the group had to go above the column and would otherwise have
    /// ended up at a negative y.
    pub fn reposition_moved(&self, page: &mut Page, group_id: GroupId) -> Vec2 {
        let Some(column) = find_group_column(page.groups(), group_id) else {
            return Vec2::ZERO;
        };
        let (Some(bounds), Some(group)) = (column.bounds, page.group(group_id)) else {
            return Vec2::ZERO;
        };
        if !column.overlaps {
            return Vec2::ZERO;
        }
        let frame = group.frame();

        if let Some(fitted) = column.fit_in_gap(frame, self.spacing) {
            log::trace!("moved group {} fits a gap at y={}", group_id, fitted.y0);
            page.set_group_frame(group_id, fitted);
            return Vec2::ZERO;
        }

        if frame.center().y >= bounds.center().y {
            let below = with_min_y(frame, bounds.y1 + self.spacing);
            log::trace!("moved group {} pushed below column", group_id);
            page.set_group_frame(group_id, below);
            return Vec2::ZERO;
        }

        let above = with_min_y(frame, bounds.y0 - self.spacing - frame.height());
        log::trace!("moved group {} pushed above column", group_id);
        page.set_group_frame(group_id, above);
        let shift = Vec2::new(0.0, (-above.y0).max(0.0));
        if shift.y > 0.0 {
            page.offset_all_groups(shift);
        }
        shift
    }

    /// Push overlapping groups down, column by column.
    ///
    /// Each column is walked top to bottom. A group whose top edge sits
    /// closer than twice the spacing to the lowest edge seen so far moves
    /// down to exactly that distance. Page order is left untouched.
    pub fn reposition_groups(&self, page: &mut Page) {
        let spacing = self.spacing;
        for bucket in column_buckets(page.groups()) {
            let mut members: Vec<(GroupId, Rect)> = bucket
                .iter()
                .map(|&i| (page.groups()[i].id(), page.groups()[i].frame()))
                .collect();
            members.sort_by(|a, b| a.1.y0.total_cmp(&b.1.y0));

            let Some(&(_, first)) = members.first() else {
                continue;
            };
            let mut running_max = first.y1;
            for &(id, frame) in members.iter().skip(1) {
                let mut frame = frame;
                if frame.y0 - spacing < running_max + spacing {
                    frame = with_min_y(frame, running_max + 2.0 * spacing);
                    log::trace!("repack moves group {} to y={}", id, frame.y0);
                    page.set_group_frame(id, frame);
                }
                running_max = running_max.max(frame.y1);
            }
        }
    }

    /// Resize a frame horizontally and keep it clear of other groups.
    ///
    /// The dragged edge moves by `dx` but never closer than `min_width` to the
    /// opposite edge. The overlap with each group the frame actually
    /// intersects is then cut off the nearer horizontal side. When that leaves
    /// the frame narrower than `min_width` the initial frame is kept.
    pub fn resize_horizontally(
        &self,
        page: &Page,
        group_id: GroupId,
        initial: Rect,
        edge: HorizontalEdge,
        dx: f64,
        min_width: f64,
    ) -> Rect {
        let candidate = match edge {
            HorizontalEdge::Left => {
                let x0 = (initial.x0 + dx).min(initial.x1 - min_width);
                Rect::new(x0, initial.y0, initial.x1, initial.y1)
            }
            HorizontalEdge::Right => {
                let x1 = (initial.x1 + dx).max(initial.x0 + min_width);
                Rect::new(initial.x0, initial.y0, x1, initial.y1)
            }
        };
        let mut frame = candidate;
        for other in page.groups().iter().filter(|g| g.id() != group_id) {
            if let Some(region) = intersection(frame, other.frame()) {
                frame = subtract_from_nearest_horizontal_side(frame, region);
            }
        }
        if frame.width() < min_width {
            log::trace!("no room to resize group {}, keeping {:?}", group_id, initial);
            return initial;
        }
        frame
    }
}
