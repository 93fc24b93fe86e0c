//! Horizontal band partitioning for worker threads.

/// One worker's slice of the screen: a contiguous run of rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Band {
    pub index: usize,
    pub y_start: u32,
    pub height: u32,
}

impl Band {
    /// First row past the band.
    pub fn y_end(&self) -> u32 {
        self.y_start + self.height
    }
}

/// Splits `screen_height` rows into `num_threads` bands.
///
/// Every band gets `screen_height / num_threads` rows and the last band
/// absorbs the remainder, so each row lands in exactly one band. With more
/// threads than rows the leading bands come out empty.
pub fn build_bands(screen_height: u32, num_threads: u32) -> Vec<Band> {
    let count = num_threads.max(1);
    let step = screen_height / count;
    let mut bands = Vec::with_capacity(count as usize);
    let mut y = 0u32;
    for index in 0..count {
        let height = if index == count - 1 {
            screen_height - y
        } else {
            step
        };
        bands.push(Band {
            index: index as usize,
            y_start: y,
            height,
        });
        y += height;
    }
    bands
}

#[cfg(test)]
mod tests {
    use super::*;

    fn total_rows(bands: &[Band]) -> u32 {
        bands.iter().map(|b| b.height).sum()
    }

    #[test]
    fn single_band_covers_everything() {
        let bands = build_bands(480, 1);
        assert_eq!(bands.len(), 1);
        assert_eq!(bands[0].y_start, 0);
        assert_eq!(bands[0].height, 480);
    }

    #[test]
    fn last_band_absorbs_the_remainder() {
        let bands = build_bands(100, 3);
        assert_eq!(bands.len(), 3);
        assert_eq!(bands[0].height, 33);
        assert_eq!(bands[1].height, 33);
        assert_eq!(bands[2].height, 34);
        assert_eq!(bands[2].y_start, 66);
        assert_eq!(total_rows(&bands), 100);
    }

    #[test]
    fn bands_are_contiguous_and_disjoint() {
        let bands = build_bands(997, 8);
        assert_eq!(total_rows(&bands), 997);
        for pair in bands.windows(2) {
            assert_eq!(pair[0].y_end(), pair[1].y_start);
        }
        assert_eq!(bands.last().unwrap().y_end(), 997);
    }

    #[test]
    fn more_threads_than_rows_leaves_leading_bands_empty() {
        let bands = build_bands(2, 4);
        assert_eq!(bands.len(), 4);
        assert_eq!(bands[0].height, 0);
        assert_eq!(bands[2].height, 0);
        assert_eq!(bands[3].height, 2);
        assert_eq!(total_rows(&bands), 2);
    }
}
