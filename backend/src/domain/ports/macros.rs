//! `define_port_error!`: repository error enums with snake_case constructors.
//!
//! Variants are either bare or carry one named field; the generated
//! constructor for the latter accepts anything convertible into the field's
//! type, so adapters can write `.map_err(PortError::query)` on a `String`.

macro_rules! define_port_error {
    (@constructor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@constructor $variant:ident $field:ident : $ty:ty) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($field: impl Into<$ty>) -> Self {
                Self::$variant { $field: $field.into() }
            }
        }
    };

    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $field:ident : $ty:ty } )? => $message:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $field: $ty } )?,
            )+
        }

        impl $name {
            $(
                define_port_error!(@constructor $variant $( $field : $ty )?);
            )+
        }
    };
}

pub(crate) use define_port_error;
