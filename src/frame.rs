use crate::depth::DepthMap;
use crate::skeleton::Skeleton;

pub struct Frame {
    pub depth: DepthMap,
    pub skeletons: Vec<Skeleton>,
    pub timestamp: f32, // in seconds
}

impl Frame {
    pub fn new(depth: DepthMap, skeletons: Vec<Skeleton>, timestamp: f32) -> Self {
        Self {
            depth,
            skeletons,
            timestamp,
        }
    }

    #[inline]
    pub fn dims(&self) -> (usize, usize) {
        (self.depth.width(), self.depth.height())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.skeletons.len()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Skeleton> {
        self.skeletons.iter()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.skeletons.is_empty()
    }
}
