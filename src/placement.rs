/// Spatial operations the `acquire_at*` and `acquire_attached*` helpers of
/// [`PoolController`](crate::PoolController) need from an instance.
///
/// The pool never looks at these values; it only forwards what the caller
/// passed in, after the instance has been spawned.
pub trait Placeable {
    /// World-space position.
    type Position;
    /// World-space rotation.
    type Rotation;
    /// Whatever an instance can be parented under.
    type Anchor: ?Sized;

    /// Moves the instance to `position`, keeping its parent.
    fn set_position(&mut self, position: Self::Position);

    /// Sets the world-space rotation.
    fn set_rotation(&mut self, rotation: Self::Rotation);

    /// Re-parents the instance under `anchor`. With `preserve_world` the
    /// instance keeps its world-space placement, otherwise its current local
    /// placement is reinterpreted relative to the anchor.
    fn attach_to(&mut self, anchor: &Self::Anchor, preserve_world: bool);

    /// Moves the instance onto its parent's origin.
    fn reset_local_position(&mut self);
}
