//! Erase tool: one deletion affordance per committed annotation.

use kline_core::{OhlcvSeries, SeriesKey};

use crate::coords::{PixelPos, PixelRect, ScreenPos};

use super::store::AnnotationStore;
use super::types::DrawingId;

/// Side length of the square erase affordance.
pub const ERASE_AFFORDANCE_SIZE: i32 = 16;

/// Clickable erase button derived from an annotation on demand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EraseAffordance {
    pub id: DrawingId,
    pub center: ScreenPos,
    pub bounds: PixelRect,
}

impl EraseAffordance {
    fn new(id: DrawingId, center: ScreenPos) -> Self {
        let half = f64::from(ERASE_AFFORDANCE_SIZE) / 2.0;
        let bounds = PixelRect::new(
            (center.x - half).round() as i32,
            (center.y - half).round() as i32,
            ERASE_AFFORDANCE_SIZE,
            ERASE_AFFORDANCE_SIZE,
        );
        Self { id, center, bounds }
    }
}

/// Erase mode. Holds only the ids committed when the tool was selected; the
/// annotations themselves stay in the store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EraseTool {
    ids: Vec<DrawingId>,
}

impl EraseTool {
    pub fn new(ids: Vec<DrawingId>) -> Self {
        Self { ids }
    }

    pub fn ids(&self) -> &[DrawingId] {
        &self.ids
    }

    /// Affordances for every annotation still in the store with a visible hit.
    pub fn affordances(&self, store: &AnnotationStore, key: &SeriesKey, series: &OhlcvSeries) -> Vec<EraseAffordance> {
        self.ids
            .iter()
            .filter_map(|&id| {
                let annotation = store.get(key, id)?;
                let center = annotation.erase_anchor(series)?;
                Some(EraseAffordance::new(id, center))
            })
            .collect()
    }

    /// Annotation whose affordance is under `pos`.
    pub fn hit_test(
        &self,
        pos: PixelPos,
        store: &AnnotationStore,
        key: &SeriesKey,
        series: &OhlcvSeries,
    ) -> Option<DrawingId> {
        self.affordances(store, key, series)
            .into_iter()
            .find(|affordance| affordance.bounds.contains(pos))
            .map(|affordance| affordance.id)
    }
}
