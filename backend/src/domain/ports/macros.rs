//! Helper macro for generating driven-port error enums.
//!
//! Every generated enum carries `Connection` and `Query` variants labelled
//! with the store name, followed by any port-specific variants. Snake-case
//! constructors accept `impl Into<T>` for each field.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@ctor_impl $variant () () $( $field : $ty, )*);
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) ) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor_impl
            $variant
            ($($params)* $field: impl Into<$ty>,)
            ($($inits)* $field: $field.into(),)
            $($rest)*
        );
    };
    (
        $(#[$outer:meta])*
        pub enum $name:ident for $store:literal {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            /// The store could not be reached.
            #[error("{store} connection failed: {message}", store = $store)]
            Connection { message: String },
            /// Query or mutation failed during execution.
            #[error("{store} query failed: {message}", store = $store)]
            Query { message: String },
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            define_port_error!(@ctor Connection { message: String });
            define_port_error!(@ctor Query { message: String });
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*

            /// Translate store-level failures into the domain's generic errors.
            ///
            /// Connection failures become the retryable "try again later"
            /// error; query failures become a redacted internal error. Returns
            /// `None` for port-specific variants, which the caller maps.
            pub fn store_failure(&self) -> Option<$crate::domain::Error> {
                match self {
                    Self::Connection { message } => {
                        ::tracing::warn!(store = $store, %message, "store unavailable");
                        Some($crate::domain::Error::service_unavailable())
                    }
                    Self::Query { message } => {
                        ::tracing::error!(store = $store, %message, "store query failed");
                        Some($crate::domain::Error::internal(format!(
                            "{} query failed",
                            $store
                        )))
                    }
                    #[allow(unreachable_patterns)]
                    _ => None,
                }
            }
        }
    };
}

pub(crate) use define_port_error;
