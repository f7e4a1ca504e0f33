/// Generates `get_<name>` and `delete_<name>` for a REST resource that
/// answers `GET/DELETE <path>/:id` with a bare (non-enveloped) body.
#[macro_export]
macro_rules! impl_resource_methods {
    ($client_name:ident, $entity:ty, $path:literal, $entity_name_snake:ident) => {
        paste::paste! {
            impl $client_name {
                #[tracing::instrument(skip(self))]
                pub async fn [<get_ $entity_name_snake>](&self, id: &str) -> Result<$entity, $crate::error::ApiError> {
                    tracing::debug!("Sending request");
                    self.api.get(&format!(concat!($path, "/{}"), $crate::http::encode_component(id))).await
                }

                #[tracing::instrument(skip(self))]
                pub async fn [<delete_ $entity_name_snake>](&self, id: &str) -> Result<(), $crate::error::ApiError> {
                    tracing::debug!("Sending request");
                    self.api.delete(&format!(concat!($path, "/{}"), $crate::http::encode_component(id))).await
                }
            }
        }
    };
}

#[macro_export]
macro_rules! impl_client_new {
    ($client_name:ident) => {
        impl $client_name {
            pub fn new(api: $crate::http::ApiClient) -> Self {
                Self { api }
            }
        }
    };
}

#[macro_export]
macro_rules! impl_basic_client {
    ($client_name:ident, $entity:ty, $path:literal, $entity_name_snake:ident) => {
        $crate::impl_client_new!($client_name);
        $crate::impl_resource_methods!($client_name, $entity, $path, $entity_name_snake);
    };
}
