//! Committed annotations per (instrument, timeframe).

use std::collections::HashMap;

use kline_core::SeriesKey;
use thiserror::Error;

use super::types::{Annotation, DrawingId};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum StoreError {
    #[error("annotation {0} is not finished")]
    Unfinished(DrawingId),
}

/// Owns every committed annotation by value, keyed by series and id.
#[derive(Debug, Default)]
pub struct AnnotationStore {
    by_key: HashMap<SeriesKey, HashMap<DrawingId, Annotation>>,
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commit a finished annotation.
    pub fn insert(&mut self, key: &SeriesKey, annotation: Annotation) -> Result<DrawingId, StoreError> {
        if !annotation.is_finished() {
            return Err(StoreError::Unfinished(annotation.id));
        }
        let id = annotation.id;
        self.by_key.entry(key.clone()).or_default().insert(id, annotation);
        Ok(id)
    }

    pub fn get(&self, key: &SeriesKey, id: DrawingId) -> Option<&Annotation> {
        self.by_key.get(key)?.get(&id)
    }

    /// Erase one annotation.
    pub fn remove(&mut self, key: &SeriesKey, id: DrawingId) -> Option<Annotation> {
        self.by_key.get_mut(key)?.remove(&id)
    }

    /// Erase every annotation of `key`, returning how many were removed.
    pub fn clear(&mut self, key: &SeriesKey) -> usize {
        self.by_key.remove(key).map_or(0, |annotations| annotations.len())
    }

    /// Annotations of `key` in creation order.
    pub fn annotations(&self, key: &SeriesKey) -> Vec<&Annotation> {
        let mut annotations: Vec<&Annotation> = self.by_key.get(key).into_iter().flat_map(HashMap::values).collect();
        annotations.sort_by_key(|a| a.id);
        annotations
    }

    pub fn annotations_mut(&mut self, key: &SeriesKey) -> impl Iterator<Item = &mut Annotation> {
        self.by_key.get_mut(key).into_iter().flat_map(HashMap::values_mut)
    }

    /// Ids of `key` in creation order.
    pub fn ids(&self, key: &SeriesKey) -> Vec<DrawingId> {
        self.annotations(key).iter().map(|a| a.id).collect()
    }

    pub fn len(&self, key: &SeriesKey) -> usize {
        self.by_key.get(key).map_or(0, HashMap::len)
    }

    pub fn is_empty(&self, key: &SeriesKey) -> bool {
        self.len(key) == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawing::types::{AnchorPoint, Drawing, ToolPhase};
    use kline_core::Timeframe;

    fn finished_line(price: f64) -> Annotation {
        let mut annotation = Annotation::new(Drawing::HorizontalLine {
            anchor: AnchorPoint::new(0.0, price),
        });
        annotation.phase = ToolPhase::Finished;
        annotation
    }

    #[test]
    fn test_insert_requires_finished() {
        let key = SeriesKey::new("2330.tw", Timeframe::Day1);
        let mut store = AnnotationStore::new();
        let unfinished = Annotation::new(Drawing::HorizontalLine {
            anchor: AnchorPoint::default(),
        });
        let id = unfinished.id;
        assert_eq!(store.insert(&key, unfinished), Err(StoreError::Unfinished(id)));
        assert!(store.is_empty(&key));
    }

    #[test]
    fn test_keys_are_separate() {
        let day = SeriesKey::new("2330.tw", Timeframe::Day1);
        let minute = SeriesKey::new("2330.tw", Timeframe::Min1);
        let mut store = AnnotationStore::new();
        let a = store.insert(&day, finished_line(1.0)).unwrap();
        let b = store.insert(&day, finished_line(2.0)).unwrap();
        store.insert(&minute, finished_line(3.0)).unwrap();

        assert_eq!(store.ids(&day), vec![a, b]);
        assert_eq!(store.len(&minute), 1);

        assert!(store.remove(&day, a).is_some());
        assert!(store.remove(&day, a).is_none());
        assert_eq!(store.ids(&day), vec![b]);

        assert_eq!(store.clear(&day), 1);
        assert_eq!(store.clear(&day), 0);
        assert_eq!(store.len(&minute), 1);
    }

    #[test]
    fn test_annotations_mut() {
        let key = SeriesKey::new("2330.tw", Timeframe::Day1);
        let mut store = AnnotationStore::new();
        store.insert(&key, finished_line(1.0)).unwrap();
        store.insert(&key, finished_line(2.0)).unwrap();

        for annotation in store.annotations_mut(&key) {
            annotation.chart_index = 2;
        }
        assert!(store.annotations(&key).iter().all(|a| a.chart_index == 2));
        assert_eq!(store.annotations_mut(&SeriesKey::new("0050.tw", Timeframe::Day1)).count(), 0);
    }
}
