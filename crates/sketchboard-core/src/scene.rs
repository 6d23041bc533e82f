//! The ordered collection of drawn elements.

use crate::geometry::{self, point_in_bounds, rects_intersect};
use crate::shapes::{DrawingElement, ElementId};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Drawn elements in insertion order.
///
/// Insertion order is z-order: later elements are drawn on top and are
/// hit-tested first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    elements: Vec<DrawingElement>,
}

impl Scene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_elements(elements: Vec<DrawingElement>) -> Self {
        Self { elements }
    }

    /// Add an element on top of everything else.
    pub fn push(&mut self, element: DrawingElement) {
        self.elements.push(element);
    }

    /// Remove an element by ID.
    pub fn remove(&mut self, id: ElementId) -> Option<DrawingElement> {
        let index = self.elements.iter().position(|e| e.id() == id)?;
        Some(self.elements.remove(index))
    }

    /// Remove every element whose ID is in `ids`. Returns how many were removed.
    pub fn remove_all(&mut self, ids: &[ElementId]) -> usize {
        let before = self.elements.len();
        self.elements.retain(|e| !ids.contains(&e.id()));
        before - self.elements.len()
    }

    pub fn get(&self, id: ElementId) -> Option<&DrawingElement> {
        self.elements.iter().find(|e| e.id() == id)
    }

    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut DrawingElement> {
        self.elements.iter_mut().find(|e| e.id() == id)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.get(id).is_some()
    }

    /// Elements back to front.
    pub fn iter(&self) -> impl Iterator<Item = &DrawingElement> {
        self.elements.iter()
    }

    pub fn elements(&self) -> &[DrawingElement] {
        &self.elements
    }

    /// Elements whose IDs are in `ids`, in z-order.
    pub fn select<'a>(
        &'a self,
        ids: &'a [ElementId],
    ) -> impl Iterator<Item = &'a DrawingElement> + 'a {
        self.elements.iter().filter(move |e| ids.contains(&e.id()))
    }

    /// Mutable access to the elements whose IDs are in `ids`.
    pub fn select_mut<'a>(
        &'a mut self,
        ids: &'a [ElementId],
    ) -> impl Iterator<Item = &'a mut DrawingElement> + 'a {
        self.elements.iter_mut().filter(move |e| ids.contains(&e.id()))
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn ids(&self) -> Vec<ElementId> {
        self.elements.iter().map(|e| e.id()).collect()
    }

    /// Topmost element whose bounds contain `point` (world coordinates).
    pub fn element_at(&self, point: Point) -> Option<&DrawingElement> {
        self.elements
            .iter()
            .rev()
            .find(|e| point_in_bounds(point, e.bounds()))
    }

    /// IDs of the elements whose bounds intersect `rect`, touching included, in z-order.
    pub fn elements_in_rect(&self, rect: Rect) -> Vec<ElementId> {
        self.elements
            .iter()
            .filter(|e| rects_intersect(rect, e.bounds()))
            .map(|e| e.id())
            .collect()
    }

    /// Bounds of everything in the scene, or `None` when empty.
    pub fn bounds(&self) -> Option<Rect> {
        if self.elements.is_empty() {
            None
        } else {
            Some(geometry::combined_bounds(&self.elements))
        }
    }

    /// Serialize the scene to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a scene from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{ElementKind, ElementStyle};

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> DrawingElement {
        DrawingElement::two_point(
            ElementKind::Rectangle,
            Point::new(x0, y0),
            Point::new(x1, y1),
            ElementStyle::default(),
        )
    }

    #[test]
    fn test_push_and_remove() {
        let mut scene = Scene::new();
        let r = rect(0.0, 0.0, 10.0, 10.0);
        let id = r.id();
        scene.push(r);
        assert_eq!(scene.len(), 1);
        assert!(scene.contains(id));
        assert!(scene.remove(id).is_some());
        assert!(scene.is_empty());
        assert!(scene.remove(id).is_none());
    }

    #[test]
    fn test_element_at_prefers_topmost() {
        let mut scene = Scene::new();
        let below = rect(0.0, 0.0, 100.0, 100.0);
        let above = rect(50.0, 50.0, 150.0, 150.0);
        let (below_id, above_id) = (below.id(), above.id());
        scene.push(below);
        scene.push(above);

        assert_eq!(scene.element_at(Point::new(75.0, 75.0)).map(|e| e.id()), Some(above_id));
        assert_eq!(scene.element_at(Point::new(25.0, 25.0)).map(|e| e.id()), Some(below_id));
        assert!(scene.element_at(Point::new(500.0, 500.0)).is_none());
    }

    #[test]
    fn test_elements_in_rect_includes_touching() {
        let mut scene = Scene::new();
        let touching = rect(50.0, 0.0, 60.0, 10.0);
        let inside = rect(10.0, 10.0, 20.0, 20.0);
        let outside = rect(51.0, 0.0, 60.0, 10.0);
        let (touching_id, inside_id) = (touching.id(), inside.id());
        scene.push(touching);
        scene.push(inside);
        scene.push(outside);

        let hits = scene.elements_in_rect(Rect::new(0.0, 0.0, 50.0, 50.0));
        assert_eq!(hits, vec![touching_id, inside_id]);
    }

    #[test]
    fn test_remove_all() {
        let mut scene = Scene::new();
        let a = rect(0.0, 0.0, 1.0, 1.0);
        let b = rect(2.0, 2.0, 3.0, 3.0);
        let ids = vec![a.id(), b.id()];
        scene.push(a);
        scene.push(b);
        scene.push(rect(4.0, 4.0, 5.0, 5.0));
        assert_eq!(scene.remove_all(&ids), 2);
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn test_json_roundtrip() {
        let mut scene = Scene::new();
        scene.push(rect(0.0, 0.0, 10.0, 5.0));
        scene.push(DrawingElement::text(
            Point::new(1.0, 1.0),
            "note",
            16.0,
            ElementStyle::default(),
        ));
        let back = Scene::from_json(&scene.to_json().unwrap()).unwrap();
        assert_eq!(back, scene);
    }
}
