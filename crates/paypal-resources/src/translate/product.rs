use paypal_core::{AttributeMap, AttributeValue, ResourceKind, attribute_map};
use paypal_remote::Product;

use super::{Node, TranslateError, Translator, field_case};

const KIND: ResourceKind = ResourceKind::CatalogProduct;

pub struct ProductTranslator;

impl Translator for ProductTranslator {
    type Remote = Product;

    fn to_remote(&self, tree: &AttributeMap) -> Result<Product, TranslateError> {
        let root = Node::root(tree);
        Ok(Product {
            id: String::new(),
            name: root.str("name")?.to_string(),
            description: root.opt_str("description")?.map(str::to_string),
            product_type: field_case(KIND, "type").outbound(root.str("type")?),
            category: root
                .opt_str("category")?
                .map(|c| field_case(KIND, "category").outbound(c)),
            image_url: root.str("image_url")?.to_string(),
            home_url: root.str("home_url")?.to_string(),
            create_time: None,
            update_time: None,
        })
    }

    fn from_remote(&self, product: &Product) -> AttributeMap {
        let mut tree = attribute_map([
            ("name", AttributeValue::from(product.name.as_str())),
            ("image_url", product.image_url.as_str().into()),
            ("home_url", product.home_url.as_str().into()),
            (
                "type",
                field_case(KIND, "type").inbound(&product.product_type).into(),
            ),
        ]);
        if let Some(description) = &product.description {
            tree.insert("description".into(), description.as_str().into());
        }
        if let Some(category) = &product.category {
            tree.insert(
                "category".into(),
                field_case(KIND, "category").inbound(category).into(),
            );
        }
        tree
    }
}
