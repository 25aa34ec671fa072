//! Form parameters for creating a hosted checkout session.
//!
//! The processor takes `application/x-www-form-urlencoded` bodies with
//! bracketed keys, e.g. `line_items[0][price_data][unit_amount]=1999`.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use super::PaymentError;
use crate::config::{CHECKOUT_CURRENCY, EXPRESS_SHIPPING_CENTS, SHIPPING_COUNTRIES};
use crate::domain::{CheckoutAddress, CheckoutItem, CheckoutRequest};

pub const SOURCE_SIMPLE: &str = "smrtmart_website";
pub const SOURCE_FULL_INFO: &str = "smrtmart_website_full_info";

/// Where the customer lands after paying or abandoning checkout
#[derive(Debug, Clone)]
pub struct RedirectUrls<'a> {
    pub success: &'a str,
    pub cancel: &'a str,
}

/// Ordered key/value pairs ready for form encoding
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FormParams(Vec<(String, String)>);

impl FormParams {
    fn push(&mut self, key: impl Into<String>, value: impl ToString) {
        self.0.push((key.into(), value.to_string()));
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_prefix(&self, prefix: &str) -> bool {
        self.0.iter().any(|(k, _)| k.starts_with(prefix))
    }

    pub fn as_pairs(&self) -> &[(String, String)] {
        &self.0
    }
}

/// Price in cents, rounding half away from zero.
pub fn to_cents(price: Decimal) -> Result<i64, PaymentError> {
    (price * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or_else(|| PaymentError::InvalidAmount(price.to_string()))
}

/// Absolute URLs pass through; bare file names are served from the asset base.
pub fn resolve_image_url(asset_base: &str, image: &str) -> String {
    if image.starts_with("http://") || image.starts_with("https://") {
        image.to_string()
    } else {
        format!(
            "{}/{}",
            asset_base.trim_end_matches('/'),
            image.trim_start_matches('/')
        )
    }
}

/// Build the session parameters, choosing the prefilled flow when the request
/// carries customer and shipping details.
pub fn checkout_session_params(
    request: &CheckoutRequest,
    urls: RedirectUrls<'_>,
    asset_base: &str,
) -> Result<FormParams, PaymentError> {
    let mut form = FormParams::default();

    form.push("payment_method_types[0]", "card");
    form.push("mode", "payment");
    form.push("success_url", urls.success);
    form.push("cancel_url", urls.cancel);
    form.push("customer_email", request.effective_email().trim());

    for (index, item) in request.items.iter().enumerate() {
        push_line_item(&mut form, index, item, asset_base)?;
    }

    match (&request.customer_info, &request.shipping_address) {
        (Some(customer), Some(shipping)) if request.is_full_info() => {
            push_shipping_options(&mut form);

            form.push("metadata[source]", SOURCE_FULL_INFO);
            form.push("metadata[customer_first_name]", &customer.first_name);
            form.push("metadata[customer_last_name]", &customer.last_name);
            form.push("metadata[customer_phone]", &customer.phone);
            push_address_metadata(&mut form, "shipping", shipping);

            if let Some(billing) = &request.billing_address {
                push_address_metadata(&mut form, "billing", billing);
            }
        }
        _ => {
            for (index, country) in SHIPPING_COUNTRIES.iter().enumerate() {
                form.push(
                    format!("shipping_address_collection[allowed_countries][{index}]"),
                    country,
                );
            }
            form.push("metadata[source]", SOURCE_SIMPLE);
        }
    }

    Ok(form)
}

fn push_line_item(
    form: &mut FormParams,
    index: usize,
    item: &CheckoutItem,
    asset_base: &str,
) -> Result<(), PaymentError> {
    let prefix = format!("line_items[{index}]");

    form.push(format!("{prefix}[price_data][currency]"), CHECKOUT_CURRENCY);
    form.push(format!("{prefix}[price_data][product_data][name]"), &item.name);
    if let Some(description) = item.description.as_deref().filter(|d| !d.trim().is_empty()) {
        form.push(
            format!("{prefix}[price_data][product_data][description]"),
            description,
        );
    }
    for (image_index, image) in item.images.iter().enumerate() {
        form.push(
            format!("{prefix}[price_data][product_data][images][{image_index}]"),
            resolve_image_url(asset_base, image),
        );
    }
    form.push(
        format!("{prefix}[price_data][unit_amount]"),
        to_cents(item.price)?,
    );
    form.push(format!("{prefix}[quantity]"), item.quantity);

    Ok(())
}

fn push_shipping_options(form: &mut FormParams) {
    let options = [("Free Shipping", 0), ("Express Shipping", EXPRESS_SHIPPING_CENTS)];

    for (index, (name, amount)) in options.iter().enumerate() {
        let prefix = format!("shipping_options[{index}][shipping_rate_data]");
        form.push(format!("{prefix}[type]"), "fixed_amount");
        form.push(format!("{prefix}[fixed_amount][amount]"), amount);
        form.push(format!("{prefix}[fixed_amount][currency]"), CHECKOUT_CURRENCY);
        form.push(format!("{prefix}[display_name]"), name);

        if *amount > 0 {
            form.push(format!("{prefix}[delivery_estimate][minimum][unit]"), "business_day");
            form.push(format!("{prefix}[delivery_estimate][minimum][value]"), 1);
            form.push(format!("{prefix}[delivery_estimate][maximum][unit]"), "business_day");
            form.push(format!("{prefix}[delivery_estimate][maximum][value]"), 3);
        }
    }
}

fn push_address_metadata(form: &mut FormParams, kind: &str, address: &CheckoutAddress) {
    form.push(format!("metadata[{kind}_address_line1]"), &address.address_line1);
    form.push(format!("metadata[{kind}_city]"), &address.city);
    form.push(format!("metadata[{kind}_state]"), &address.state);
    form.push(format!("metadata[{kind}_country]"), &address.country);
}
