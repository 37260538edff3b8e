//! Pointers to, and type-erased handles of, objects managed by a
//! [Container](crate::container::Container).

use crate::contract::Contract;
use crate::error::ContainerError;
use std::any::{type_name, Any, TypeId};
use std::fmt::{Debug, Formatter};
#[cfg(not(feature = "threadsafe"))]
use std::rc::Rc;
#[cfg(feature = "threadsafe")]
use std::sync::Arc;

#[cfg(not(feature = "threadsafe"))]
pub type InstancePtr<T> = Rc<T>;
#[cfg(feature = "threadsafe")]
pub type InstancePtr<T> = Arc<T>;

#[cfg(not(feature = "threadsafe"))]
pub type InstanceAnyPtr = InstancePtr<dyn Any + 'static>;
#[cfg(feature = "threadsafe")]
pub type InstanceAnyPtr = InstancePtr<dyn Any + Send + Sync + 'static>;

/// Marker trait for types which can be stored in a container. Includes the `Send + Sync` bounds
/// when using the `threadsafe` feature.
#[cfg(feature = "threadsafe")]
pub trait Injectable: Send + Sync + 'static {}

/// Marker trait for types which can be stored in a container. Includes the `Send + Sync` bounds
/// when using the `threadsafe` feature.
#[cfg(not(feature = "threadsafe"))]
pub trait Injectable: 'static {}

#[cfg(feature = "threadsafe")]
impl<T: ?Sized + Send + Sync + 'static> Injectable for T {}

#[cfg(not(feature = "threadsafe"))]
impl<T: ?Sized + 'static> Injectable for T {}

/// A type-erased handle to an [InstancePtr]. Cloning the handle never clones the object itself,
/// so two clones always point to the same object.
#[derive(Clone)]
pub struct Instance {
    // always holds an InstancePtr<T>, which allows storing unsized types like dyn Trait
    value: InstanceAnyPtr,
    type_id: TypeId,
    type_name: &'static str,
    address: usize,
}

impl Instance {
    /// Wraps an existing pointer.
    pub fn new<T: Injectable + ?Sized>(instance: InstancePtr<T>) -> Self {
        Self {
            address: InstancePtr::as_ptr(&instance) as *const () as usize,
            value: InstancePtr::new(instance) as InstanceAnyPtr,
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
        }
    }

    /// Moves the given value into a new pointer and wraps it.
    #[inline]
    pub fn of<T: Injectable>(value: T) -> Self {
        Self::new(InstancePtr::new(value))
    }

    /// Recovers the typed pointer. Fails if the wrapped object is not exactly an `InstancePtr<T>`.
    pub fn downcast<T: ?Sized + 'static>(&self) -> Result<InstancePtr<T>, ContainerError> {
        self.value
            .downcast_ref::<InstancePtr<T>>()
            .cloned()
            .ok_or_else(|| ContainerError::IncompatibleInstance {
                expected: type_name::<T>(),
                actual: self.type_name,
            })
    }

    /// Name of the wrapped type.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Type contract of the wrapped pointer, i.e. the concrete type for objects wrapped with
    /// [Instance::of].
    #[inline]
    pub fn contract(&self) -> Contract {
        Contract::Type {
            id: self.type_id,
            name: self.type_name,
        }
    }

    /// Checks if both handles point to the same object.
    #[inline]
    pub fn ptr_eq(&self, other: &Instance) -> bool {
        self.address == other.address
    }
}

impl Debug for Instance {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Instance")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

impl<T: Injectable + ?Sized> From<InstancePtr<T>> for Instance {
    #[inline]
    fn from(value: InstancePtr<T>) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use crate::contract::Contract;
    use crate::error::ContainerError;
    use crate::instance::{Instance, InstancePtr};

    trait TestTrait {
        fn value(&self) -> i8;
    }

    struct TestComponent;

    impl TestTrait for TestComponent {
        fn value(&self) -> i8 {
            5
        }
    }

    #[test]
    fn should_downcast_to_wrapped_type() {
        let instance = Instance::of(5u8);
        assert_eq!(*instance.downcast::<u8>().unwrap(), 5);
        assert_eq!(instance.type_name(), "u8");
        assert_eq!(instance.contract(), Contract::of::<u8>());
    }

    #[test]
    fn should_reject_incompatible_type() {
        let instance = Instance::of(5u8);
        assert!(matches!(
            instance.downcast::<i8>().unwrap_err(),
            ContainerError::IncompatibleInstance {
                expected: "i8",
                actual: "u8"
            }
        ));
    }

    #[test]
    fn should_support_trait_objects() {
        #[cfg(feature = "threadsafe")]
        type TestTraitPtr = InstancePtr<dyn TestTrait + Send + Sync>;
        #[cfg(not(feature = "threadsafe"))]
        type TestTraitPtr = InstancePtr<dyn TestTrait>;

        let pointer: TestTraitPtr = InstancePtr::new(TestComponent);
        let instance = Instance::new(pointer.clone());

        #[cfg(feature = "threadsafe")]
        let recovered = instance.downcast::<dyn TestTrait + Send + Sync>().unwrap();
        #[cfg(not(feature = "threadsafe"))]
        let recovered = instance.downcast::<dyn TestTrait>().unwrap();

        assert_eq!(recovered.value(), 5);
        assert!(InstancePtr::ptr_eq(&pointer, &recovered));
    }

    #[test]
    fn should_keep_identity_across_clones() {
        let first = Instance::of(5u8);
        let second = first.clone();

        assert!(first.ptr_eq(&second));
        assert!(!first.ptr_eq(&Instance::of(5u8)));

        let pointer = InstancePtr::new(5u8);
        assert!(Instance::new(pointer.clone()).ptr_eq(&Instance::new(pointer)));
        assert!(InstancePtr::ptr_eq(
            &first.downcast::<u8>().unwrap(),
            &second.downcast::<u8>().unwrap()
        ));
    }
}
