//! Header image scoring.
//!
//! An image outside the selected content can still belong to the article,
//! typically a lead picture above the headline. Each heuristic contributes
//! a capped score; the finder keeps the best image above a threshold.

use crate::dom;
use crate::node_index::{NodeIndex, NodePos};

/// One weighted heuristic.
pub trait ImageScorer {
    /// Upper bound of this scorer's contribution.
    fn max_score(&self) -> i32;

    fn compute(&self, index: &NodeIndex, image: NodePos) -> i32;

    fn score(&self, index: &NodeIndex, image: NodePos) -> i32 {
        self.compute(index, image).min(self.max_score())
    }
}

/// Favours large images, linearly between `min_area` and `max_area`.
pub struct AreaScorer {
    pub max_score: i32,
    pub min_area: u32,
    pub max_area: u32,
}

impl ImageScorer for AreaScorer {
    fn max_score(&self) -> i32 {
        self.max_score
    }

    fn compute(&self, index: &NodeIndex, image: NodePos) -> i32 {
        let (width, height) = dom::dimensions(index.node(image));
        let area = u64::from(width) * u64::from(height);
        let min_area = u64::from(self.min_area);
        if area < min_area {
            return 0;
        }
        let range = f64::from(self.max_area.saturating_sub(self.min_area).max(1));
        let score = (area - min_area) as f64 / range * f64::from(self.max_score);
        (score as i32).min(self.max_score)
    }
}

/// Favours wide images with a landscape aspect ratio.
pub struct DimensionsRatioScorer {
    pub max_score: i32,
}

impl ImageScorer for DimensionsRatioScorer {
    fn max_score(&self) -> i32 {
        self.max_score
    }

    fn compute(&self, index: &NodeIndex, image: NodePos) -> i32 {
        let (width, height) = dom::dimensions(index.node(image));
        if height == 0 {
            return 0;
        }
        let ratio = f64::from(width) / f64::from(height);
        let multiplier = if ratio > 1.45 && ratio < 1.8 {
            1.0
        } else if ratio > 1.3 && ratio < 2.2 {
            0.4
        } else {
            0.0
        };
        (f64::from(self.max_score) * multiplier) as i32
    }
}

/// Favours images close in the tree to the first content node.
pub struct DomDistanceScorer {
    pub max_score: i32,
    pub first_content: Option<NodePos>,
}

impl ImageScorer for DomDistanceScorer {
    fn max_score(&self) -> i32 {
        self.max_score
    }

    fn compute(&self, index: &NodeIndex, image: NodePos) -> i32 {
        let Some(first) = self.first_content else {
            return 0;
        };
        let common = index.common_ancestor(first, image);
        let depth_diff = index.depth(first).saturating_sub(index.depth(common));
        let multiplier = match depth_diff {
            0..=3 => 1.0,
            4..=5 => 0.6,
            6..=7 => 0.2,
            _ => 0.0,
        };
        (f64::from(self.max_score) * multiplier) as i32
    }
}

/// Rewards images inside a `<figure>`.
pub struct HasFigureScorer {
    pub max_score: i32,
}

impl ImageScorer for HasFigureScorer {
    fn max_score(&self) -> i32 {
        self.max_score
    }

    fn compute(&self, index: &NodeIndex, image: NodePos) -> i32 {
        let mut current = index.parent(image);
        while let Some(pos) = current {
            if dom::has_tag(index.node(pos), "figure") {
                return self.max_score;
            }
            current = index.parent(pos);
        }
        0
    }
}

/// Sum of the header-image heuristics.
pub struct HeaderImageFinder {
    scorers: Vec<Box<dyn ImageScorer>>,
}

impl HeaderImageFinder {
    #[must_use]
    pub fn new(first_content: Option<NodePos>) -> Self {
        Self {
            scorers: vec![
                Box::new(AreaScorer {
                    max_score: 25,
                    min_area: 75_000,
                    max_area: 200_000,
                }),
                Box::new(DimensionsRatioScorer { max_score: 25 }),
                Box::new(DomDistanceScorer {
                    max_score: 25,
                    first_content,
                }),
                Box::new(HasFigureScorer { max_score: 15 }),
            ],
        }
    }

    /// Score an image that is not part of the selected content. Non-images
    /// score 0.
    #[must_use]
    pub fn score(&self, index: &NodeIndex, image: NodePos) -> i32 {
        if !dom::has_tag(index.node(image), "img") {
            return 0;
        }
        self.scorers.iter().map(|s| s.score(index, image)).sum()
    }
}
