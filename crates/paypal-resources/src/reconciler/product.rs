use async_trait::async_trait;
use paypal_core::{AttributeMap, ResourceKind, ResourceSchema};
use paypal_remote::{DynRemoteClient, RemoteOperation};
use tracing::{debug, info, warn};

use super::{DeleteOutcome, ObservedResource, ResourceReconciler};
use crate::error::{ReconcileError, Result};
use crate::schemas::schema_for;
use crate::translate::{ProductTranslator, Translator};

/// Prefix written to the name and description of a product on delete.
pub const REMOVED_MARKER: &str = "(removed) ";

const KIND: ResourceKind = ResourceKind::CatalogProduct;

/// Catalog products cannot be deleted remotely. Delete marks the product
/// as removed and releases it.
pub struct ProductReconciler {
    client: DynRemoteClient,
}

impl ProductReconciler {
    pub fn new(client: DynRemoteClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ResourceReconciler for ProductReconciler {
    fn kind(&self) -> ResourceKind {
        KIND
    }

    fn schema(&self) -> &'static ResourceSchema {
        schema_for(KIND)
    }

    async fn create(&self, desired: &AttributeMap) -> Result<ObservedResource> {
        self.validate(desired)?;
        let product = ProductTranslator.to_remote(desired)?;

        let created = self
            .client
            .create_product(&product)
            .await
            .map_err(|e| ReconcileError::remote(KIND, "", RemoteOperation::CreateProduct, e))?;
        info!(kind = %KIND, id = %created.id, "Created catalog product");

        self.read(&created.id).await
    }

    async fn read(&self, id: &str) -> Result<ObservedResource> {
        let product = self
            .client
            .get_product(id)
            .await
            .map_err(|e| ReconcileError::remote(KIND, id, RemoteOperation::GetProduct, e))?;
        debug!(kind = %KIND, id = %id, "Read catalog product");

        Ok(ObservedResource {
            id: product.id.clone(),
            attributes: ProductTranslator.from_remote(&product),
        })
    }

    async fn update(&self, id: &str, desired: &AttributeMap) -> Result<ObservedResource> {
        self.validate(desired)?;
        let mut product = ProductTranslator.to_remote(desired)?;
        product.id = id.to_string();

        self.client
            .update_product(&product)
            .await
            .map_err(|e| ReconcileError::remote(KIND, id, RemoteOperation::UpdateProduct, e))?;

        self.read(id).await
    }

    async fn delete(&self, id: &str) -> Result<DeleteOutcome> {
        let mut product = self
            .client
            .get_product(id)
            .await
            .map_err(|e| ReconcileError::remote(KIND, id, RemoteOperation::GetProduct, e))?;

        product.name = format!("{REMOVED_MARKER}{}", product.name);
        product.description = Some(format!(
            "{REMOVED_MARKER}{}",
            product.description.unwrap_or_default()
        ));

        self.client
            .update_product(&product)
            .await
            .map_err(|e| ReconcileError::remote(KIND, id, RemoteOperation::UpdateProduct, e))?;
        warn!(
            kind = %KIND,
            id = %id,
            "Catalog products cannot be deleted; marked as removed and released"
        );

        Ok(DeleteOutcome::SoftDeleted)
    }
}
