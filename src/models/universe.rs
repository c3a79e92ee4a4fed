use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Entry of the exchange `/products` listing
#[derive(Debug, Clone, Deserialize)]
pub struct Product {
    pub base_currency: String,
    pub quote_currency: String,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UniverseResponse {
    pub symbols: Vec<String>,
}

/// Online USD-quoted pairs as `BASE-QUOTE`
pub fn tradable_usd_symbols(products: &[Product]) -> Vec<String> {
    products
        .iter()
        .filter(|product| product.quote_currency == "USD" && product.status == "online")
        .map(|product| format!("{}-{}", product.base_currency, product.quote_currency))
        .collect()
}
