//! Collection type conversion functions.

use crate::shopify::types::{Collection, CollectionConnection};

use super::super::queries::{CollectionFields, Connection};
use super::convert_image;
use super::products::{convert_page_info, convert_product};

pub fn convert_collection(collection: CollectionFields) -> Collection {
    let (products, page_info) = match collection.products {
        Some(connection) => (
            connection.nodes.into_iter().map(convert_product).collect(),
            Some(convert_page_info(connection.page_info)),
        ),
        None => (Vec::new(), None),
    };

    Collection {
        id: collection.id,
        handle: collection.handle,
        title: collection.title,
        description: collection.description,
        description_html: collection.description_html,
        image: collection.image.map(convert_image),
        products,
        page_info,
    }
}

pub fn convert_collection_connection(
    connection: Connection<CollectionFields>,
) -> CollectionConnection {
    CollectionConnection {
        collections: connection
            .nodes
            .into_iter()
            .map(convert_collection)
            .collect(),
        page_info: convert_page_info(connection.page_info),
    }
}
