use glam::DVec2;

/// Process-local identity for a food pellet. Scoped to the owning room; two
/// rooms may reuse the same id without conflict.
pub type FoodId = u64;

#[derive(Debug, Clone, Copy)]
pub struct Food {
    pub id: FoodId,
    pub position: DVec2,
    pub value: f64,
}
