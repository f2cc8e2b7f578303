//! Column layout of a scanned strip and lookups from strip position to texture space.

use crate::error::{Result, StrataError};
use serde::{Deserialize, Serialize};

/// Column layout as delivered alongside the scan images.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMetadata {
    /// Texture-space width of one column.
    pub width: f64,
    /// Texture-space height of each column, in strip order.
    pub heights: Vec<f64>,
}

/// Column and height inside it for a position along the strip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnSample {
    pub column: usize,
    pub local_height: f64,
}

/// Texture coordinate of a strip position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TexCoord {
    /// Horizontal position inside the page, in `[0, 1)`.
    pub u: f64,
    /// Height inside the column.
    pub v: f64,
    /// Texture array layer the column lives on.
    pub page: u32,
}

/// Prefix sums over column heights; immutable once built.
#[derive(Debug, Clone)]
pub struct ColumnIndex {
    column_width: f64,
    /// `len == columns + 1`, first entry is 0.
    height_prefix_sums: Vec<f64>,
    total_height: f64,
    min_column_height: f64,
}

impl ColumnIndex {
    /// Builds the index, rejecting empty layouts and non-positive sizes.
    pub fn new(meta: &ColumnMetadata) -> Result<Self> {
        if meta.heights.is_empty() {
            return Err(StrataError::InvalidMetadata("column list is empty".into()));
        }
        if !(meta.width.is_finite() && meta.width > 0.0) {
            return Err(StrataError::InvalidMetadata(format!(
                "column width must be > 0, got {}",
                meta.width
            )));
        }

        let mut height_prefix_sums = Vec::with_capacity(meta.heights.len() + 1);
        height_prefix_sums.push(0.0);

        let mut total = 0.0;
        let mut min_column_height = f64::INFINITY;
        for (i, &h) in meta.heights.iter().enumerate() {
            if !(h.is_finite() && h > 0.0) {
                return Err(StrataError::InvalidMetadata(format!(
                    "column {i} has height {h}, heights must be > 0"
                )));
            }
            total += h;
            min_column_height = min_column_height.min(h);
            height_prefix_sums.push(total);
        }

        Ok(Self {
            column_width: meta.width,
            height_prefix_sums,
            total_height: total,
            min_column_height,
        })
    }

    #[inline]
    pub fn column_count(&self) -> usize {
        self.height_prefix_sums.len() - 1
    }

    #[inline]
    pub fn column_width(&self) -> f64 {
        self.column_width
    }

    #[inline]
    pub fn total_height(&self) -> f64 {
        self.total_height
    }

    #[inline]
    pub fn min_column_height(&self) -> f64 {
        self.min_column_height
    }

    #[inline]
    pub fn prefix_sums(&self) -> &[f64] {
        &self.height_prefix_sums
    }

    /// Number of texture pages the columns are spread over.
    pub fn page_count(&self) -> u32 {
        self.texture_coord(self.column_count() - 1, 0.0).page + 1
    }

    /// Smallest column `i` whose end height reaches `target_height`.
    ///
    /// A target sitting exactly on a boundary belongs to the earlier column.
    /// Targets past the end map to the last column.
    pub fn height_at(&self, target_height: f64) -> usize {
        let ends = &self.height_prefix_sums[1..];
        ends.partition_point(|&end| end < target_height)
            .min(self.column_count() - 1)
    }

    /// Column and local height for normalized strip position `t` (clamped to `[0, 1]`).
    pub fn sample(&self, t: f64) -> ColumnSample {
        let target = t.clamp(0.0, 1.0) * self.total_height;
        let column = self.height_at(target);
        ColumnSample {
            column,
            local_height: target - self.height_prefix_sums[column],
        }
    }

    /// Texture coordinate of a point inside `column`.
    ///
    /// Columns run left to right across a page one unit wide, so the column's
    /// offset wraps modulo 1 and the wrap count picks the page.
    pub fn texture_coord(&self, column: usize, local_height: f64) -> TexCoord {
        let offset = column as f64 * self.column_width;
        let page = offset.floor();
        TexCoord {
            u: offset - page,
            v: local_height,
            page: page as u32,
        }
    }

    /// `texture_coord` of `sample(t)`.
    pub fn texture_coord_at(&self, t: f64) -> TexCoord {
        let s = self.sample(t);
        self.texture_coord(s.column, s.local_height)
    }

    /// Normalized strip position where column `boundary` starts.
    #[inline]
    pub fn boundary_t(&self, boundary: usize) -> f64 {
        self.height_prefix_sums[boundary] / self.total_height
    }

    /// Fraction of the way from `t` to `next_t` where the first column change
    /// happens, or `None` when both lie in the same column.
    ///
    /// Expects `t < next_t`; a reversed pair reports `None`. The fraction lies
    /// in `(0, 1)` except when `t` sits exactly on a boundary: that position
    /// belongs to the earlier column, so the change happens right at `t` and
    /// the fraction is `0.0`.
    pub fn crosses_boundary(&self, t: f64, next_t: f64) -> Option<f64> {
        if next_t <= t {
            return None;
        }
        let from = self.sample(t).column;
        let to = self.sample(next_t).column;
        if from == to {
            return None;
        }
        let break_t = self.boundary_t(from + 1);
        Some((break_t - t) / (next_t - t))
    }

    /// Normalized positions of every column boundary crossed going from `t`
    /// to `next_t`, in strip order.
    pub fn boundaries_between(&self, t: f64, next_t: f64) -> impl Iterator<Item = f64> + '_ {
        let (from, to) = if next_t > t {
            (self.sample(t).column, self.sample(next_t).column)
        } else {
            (0, 0)
        };
        (from + 1..=to).map(move |b| self.boundary_t(b))
    }
}
