/// A trait defining how a pool builds new instances when it has to grow.
///
/// Any `Fn() -> T` closure is a factory, so most pools are built straight
/// from a constructor function or a closure cloning a prototype.
pub trait Factory<T> {
    /// Creates a new object of type T.
    fn create(&self) -> T;
}

impl<T, F> Factory<T> for F
where
    F: Fn() -> T,
{
    #[inline(always)]
    fn create(&self) -> T {
        self()
    }
}
