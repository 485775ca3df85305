//! Mutual exclusion for devices shared between several pin handles.

/// Any type that can implement `IOMutex` can be used to arbitrate access to a device from the
/// pins handed out by an I/O adapter such as [`AdacIO`](crate::adac::AdacIO).
///
/// With the `std` feature, `IOMutex` is implemented for `std::sync::Mutex`. With `cortexm`, it
/// is implemented for `cortex_m::interrupt::Mutex<core::cell::RefCell<T>>`, locking by running
/// the closure in an interrupt-free section. [`DefaultMutex<T>`] names whichever is enabled.
pub trait IOMutex<T> {
    /// Construct a new instance of this mutex containing the value `v`.
    fn new(v: T) -> Self;

    /// Lock the mutex and call the closure `f` as a critical section, passing a mutable reference
    /// to the owned value. Returns the value returned by `f`.
    fn lock<R, F: FnOnce(&mut T) -> R>(&self, f: F) -> R;
}

#[cfg(feature = "std")]
pub type DefaultMutex<T> = std::sync::Mutex<T>;

#[cfg(all(feature = "cortexm", not(feature = "std")))]
pub type DefaultMutex<T> = cortex_m::interrupt::Mutex<core::cell::RefCell<T>>;

#[cfg(feature = "std")]
impl<T> IOMutex<T> for std::sync::Mutex<T> {
    fn new(v: T) -> Self {
        std::sync::Mutex::new(v)
    }
    fn lock<R, F: FnOnce(&mut T) -> R>(&self, f: F) -> R {
        // A panic while a pin held the lock leaves the device state as the bus last saw it.
        let mut v = std::sync::Mutex::lock(self).unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut v)
    }
}

#[cfg(feature = "cortexm")]
impl<T> IOMutex<T> for cortex_m::interrupt::Mutex<core::cell::RefCell<T>> {
    fn new(v: T) -> Self {
        cortex_m::interrupt::Mutex::new(core::cell::RefCell::new(v))
    }
    fn lock<R, F: FnOnce(&mut T) -> R>(&self, f: F) -> R {
        cortex_m::interrupt::free(|cs| {
            let mut v = self.borrow(cs).borrow_mut();
            f(&mut v)
        })
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::{DefaultMutex, IOMutex};

    #[test]
    fn lock_returns_closure_value() {
        let m: DefaultMutex<u8> = IOMutex::new(3);
        assert_eq!(IOMutex::lock(&m, |v| *v + 1), 4);
    }

    #[test]
    fn lock_mutates() {
        let m: DefaultMutex<Vec<u8>> = IOMutex::new(Vec::new());
        IOMutex::lock(&m, |v| v.push(7));
        IOMutex::lock(&m, |v| v.push(9));
        assert_eq!(IOMutex::lock(&m, |v| v.clone()), vec![7, 9]);
    }
}
