//! Map layers: the marker layer, per-type visibility and the trench overlay.

use std::collections::BTreeSet;

use crate::marker::Marker;

/// A polyline as `[lat, lon]` vertices.
pub type Polyline = Vec<[f64; 2]>;

/// Fixed trench lines drawn by the trench overlay.
pub fn trench_lines() -> Vec<Polyline> {
    vec![
        vec![[50.62, 29.98], [50.63, 30.05], [50.65, 30.12]],
        vec![[50.58, 30.25], [50.55, 30.32], [50.52, 30.38]],
        vec![[50.48, 29.85], [50.45, 29.80]],
    ]
}

/// Markers currently rendered on the map.
///
/// Records are never edited in place: the layer is either replaced wholesale
/// by a load or grows by one local-only marker.
#[derive(Debug, Clone, Default)]
pub struct MarkerLayer {
    markers: Vec<Marker>,
    hidden_types: BTreeSet<String>,
}

impl MarkerLayer {
    /// Clear the layer and render `markers` in its place.
    pub fn replace(&mut self, markers: Vec<Marker>) {
        self.markers = markers;
    }

    pub fn push(&mut self, marker: Marker) {
        self.markers.push(marker);
    }

    pub fn clear(&mut self) {
        self.markers.clear();
    }

    /// Every marker in the layer, hidden ones included.
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Flip visibility of every marker of `kind`. Returns the new visibility.
    pub fn toggle_type(&mut self, kind: &str) -> bool {
        if self.hidden_types.remove(kind) {
            true
        } else {
            self.hidden_types.insert(kind.to_string());
            false
        }
    }

    pub fn is_type_visible(&self, kind: &str) -> bool {
        !self.hidden_types.contains(kind)
    }

    pub fn visible_markers(&self) -> impl Iterator<Item = &Marker> {
        self.markers.iter().filter(|m| self.is_type_visible(&m.kind))
    }
}

/// Toggleable overlay of enemy trench lines.
#[derive(Debug, Clone, Default)]
pub struct TrenchLayer {
    lines: Vec<Polyline>,
}

impl TrenchLayer {
    /// Flip the overlay. Turning it off clears every line.
    pub fn toggle(&mut self) -> bool {
        if self.lines.is_empty() {
            self.lines = trench_lines();
            true
        } else {
            self.lines.clear();
            false
        }
    }

    pub fn is_visible(&self) -> bool {
        !self.lines.is_empty()
    }

    pub fn lines(&self) -> &[Polyline] {
        &self.lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::mock_markers;

    #[test]
    fn replace_overwrites_previous_contents() {
        let mut layer = MarkerLayer::default();
        layer.replace(mock_markers());
        layer.replace(mock_markers()[..1].to_vec());
        assert_eq!(layer.len(), 1);
    }

    #[test]
    fn toggling_type_hides_and_restores() {
        let mut layer = MarkerLayer::default();
        layer.replace(mock_markers());

        assert!(!layer.toggle_type("enemy"));
        let visible: Vec<_> = layer.visible_markers().map(|m| m.label.as_str()).collect();
        assert_eq!(visible, ["UKR-ALPHA-1", "OBJ-BRAVO"]);
        assert_eq!(layer.len(), 3);

        assert!(layer.toggle_type("enemy"));
        assert_eq!(layer.visible_markers().count(), 3);
    }

    #[test]
    fn hidden_types_survive_reload() {
        let mut layer = MarkerLayer::default();
        layer.toggle_type("target");
        layer.replace(mock_markers());
        assert_eq!(layer.visible_markers().count(), 2);
    }

    #[test]
    fn trench_overlay_toggles() {
        let mut trenches = TrenchLayer::default();
        assert!(!trenches.is_visible());
        assert!(trenches.toggle());
        assert_eq!(trenches.lines().len(), 3);
        assert_eq!(trenches.lines()[2], vec![[50.48, 29.85], [50.45, 29.80]]);
        assert!(!trenches.toggle());
        assert!(trenches.lines().is_empty());
    }
}
