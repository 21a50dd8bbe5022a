use storefront_core::lifecycle::{setup_tracing, Storefront, StorefrontConfig};
use storefront_core::model::ProductId;
use tracing::{info, warn, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let config = StorefrontConfig::from_env().map_err(|e| e.to_string())?;
    info!(base_url = %config.base_url, "Starting storefront");

    let mut storefront = Storefront::new(config).map_err(|e| e.to_string())?;

    // Catalog screen
    let span = tracing::info_span!("catalog_screen");
    let list = async {
        storefront
            .catalog
            .load_products()
            .await
            .map_err(|e| e.to_string())
    }
    .instrument(span)
    .await?;

    let products = match list.into_result() {
        Some(Ok(products)) => products,
        Some(Err(e)) => {
            warn!(error = %e, "Catalog unavailable");
            return storefront.shutdown().await.map_err(|e| e.to_string());
        }
        None => Vec::new(),
    };
    info!(count = products.len(), "Catalog loaded");
    for product in products.iter().take(5) {
        info!(id = %product.id, title = %product.title, price = product.price, "Product");
    }

    // Detail screen for the first product, or a fixed id when the list is empty
    let id = products.first().map_or(ProductId(1), |p| p.id);
    let span = tracing::info_span!("detail_screen", %id);
    let detail = async {
        storefront
            .catalog
            .load_product(id)
            .await
            .map_err(|e| e.to_string())
    }
    .instrument(span)
    .await?;

    match detail.into_result() {
        Some(Ok(product)) => {
            info!(
                title = %product.title,
                warranty = product.warranty_label(),
                shipping = product.shipping_label(),
                "Product detail"
            );
            storefront.cart.add_to_cart(&product);
            storefront.cart.add_to_cart(&product);
            storefront.cart.decrease_quantity(product.id);
        }
        Some(Err(e)) => warn!(error = %e, "Product unavailable"),
        None => {}
    }

    // Cart badge and total
    info!(
        count = storefront.cart.count(),
        total = %format!("{:.2}", storefront.cart.total()),
        "Cart"
    );

    storefront.shutdown().await.map_err(|e| e.to_string())?;

    info!("Demo complete");
    Ok(())
}
