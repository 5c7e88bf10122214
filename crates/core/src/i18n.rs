//! Bilingual string dictionary.
//!
//! Pure lookup, no logic: a key resolves to its translation in the active
//! language, falling back to the key itself when missing so untranslated
//! strings stay visible rather than blank.

use std::collections::HashMap;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

/// Supported interface languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    #[default]
    En,
    Bg,
}

impl Lang {
    /// Two-letter language code, as persisted in the session.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Bg => "bg",
        }
    }

    /// Parse a language code; unknown codes fall back to English.
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        match code {
            "bg" => Self::Bg,
            _ => Self::En,
        }
    }

    /// Translate a key, falling back to the key itself when missing.
    #[must_use]
    pub fn t(self, key: &str) -> &str {
        let dict = match self {
            Self::En => &*EN,
            Self::Bg => &*BG,
        };
        dict.get(key).copied().unwrap_or(key)
    }
}

static EN: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| EN_STRINGS.iter().copied().collect());

static BG: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| BG_STRINGS.iter().copied().collect());

const EN_STRINGS: &[(&str, &str)] = &[
    ("nav.home", "Home"),
    ("nav.catalog", "Catalog"),
    ("nav.cart", "Cart"),
    ("nav.orders", "My Orders"),
    ("nav.login", "Login"),
    ("nav.register", "Register"),
    ("nav.logout", "Logout"),
    ("footer.copyright", "Arbor Furniture"),
    ("home.title", "Welcome to Arbor"),
    ("home.subtitle", "Browse departments and discover furniture that fits."),
    ("catalog.title", "Catalog"),
    ("catalog.select.department", "Select department"),
    ("catalog.select.category", "Select category"),
    ("catalog.search", "Search products"),
    ("catalog.view", "View"),
    ("cart.title", "Cart"),
    ("cart.empty", "Your cart is empty."),
    ("cart.product", "Product"),
    ("cart.quantity", "Quantity"),
    ("cart.checkout", "Checkout"),
    ("cart.clear", "Clear cart"),
    ("checkout.title", "Checkout"),
    ("checkout.form.title", "Create Order and Choose Payment"),
    ("checkout.name", "Name"),
    ("checkout.email", "Email"),
    ("checkout.phone", "Phone"),
    ("checkout.address", "Address"),
    ("checkout.payment_method", "Payment Method"),
    ("checkout.payment.card", "Card"),
    ("checkout.payment.bank", "Bank Transfer"),
    ("checkout.place_order", "Place Order"),
    ("checkout.success", "Order created successfully"),
    ("checkout.error", "Failed to create order"),
    ("checkout.empty_cart", "Your cart is empty."),
    ("checkout.card.title", "Pay by Card"),
    ("checkout.card.order_created", "Order created. Please enter your card details to pay."),
    ("checkout.cardholder_name", "Cardholder Name"),
    ("checkout.card_number", "Card Number"),
    ("checkout.exp_month", "Month"),
    ("checkout.exp_year", "Year"),
    ("checkout.pay", "Pay"),
    ("checkout.pay.success", "Payment successful"),
    ("checkout.pay.error", "Payment declined"),
    ("checkout.payment_completed", "Payment completed."),
    ("checkout.payment_cancelled", "Payment was cancelled."),
    ("login.title", "Login"),
    ("login.email", "Email"),
    ("login.password", "Password"),
    ("login.submit", "Login"),
    ("login.error", "Invalid email or password"),
    ("login.register_cta", "Don't have an account?"),
    ("register.title", "Register"),
    ("register.name", "Name"),
    ("register.email", "Email"),
    ("register.password", "Password"),
    ("register.address", "Address"),
    ("register.phone", "Phone"),
    ("register.submit", "Register"),
    ("register.error", "Registration failed"),
    ("orders.title", "My Orders"),
    ("orders.col.id", "ID"),
    ("orders.col.status", "Status"),
    ("orders.col.payment_status", "Payment Status"),
    ("orders.col.total", "Total"),
    ("orders.col.eta_days", "ETA (days)"),
    ("product.base_price", "Base price"),
    ("product.base_prod_time", "Base production time (days)"),
    ("product.dimensions", "Dimensions"),
    ("product.options", "Options"),
    ("product.select_options", "Select options"),
    ("product.quantity", "Quantity"),
    ("product.add_to_cart", "Add to cart"),
    ("product.added", "Added to cart"),
    ("product.recommended", "Recommended products"),
];

const BG_STRINGS: &[(&str, &str)] = &[
    ("nav.home", "Начало"),
    ("nav.catalog", "Каталог"),
    ("nav.cart", "Количка"),
    ("nav.orders", "Моите поръчки"),
    ("nav.login", "Вход"),
    ("nav.register", "Регистрация"),
    ("nav.logout", "Изход"),
    ("footer.copyright", "Arbor Мебели"),
    ("home.title", "Добре дошли в Arbor"),
    ("home.subtitle", "Разгледайте отделите и открийте подходящите мебели."),
    ("catalog.title", "Каталог"),
    ("catalog.select.department", "Изберете отдел"),
    ("catalog.select.category", "Изберете категория"),
    ("catalog.search", "Търсене на продукти"),
    ("catalog.view", "Преглед"),
    ("cart.title", "Количка"),
    ("cart.empty", "Количката е празна."),
    ("cart.product", "Продукт"),
    ("cart.quantity", "Количество"),
    ("cart.checkout", "Поръчка"),
    ("cart.clear", "Изпразни количката"),
    ("checkout.title", "Поръчка"),
    ("checkout.form.title", "Създаване на поръчка и избор на плащане"),
    ("checkout.name", "Име"),
    ("checkout.email", "Имейл"),
    ("checkout.phone", "Телефон"),
    ("checkout.address", "Адрес"),
    ("checkout.payment_method", "Метод на плащане"),
    ("checkout.payment.card", "Карта"),
    ("checkout.payment.bank", "Банков превод"),
    ("checkout.place_order", "Направи поръчка"),
    ("checkout.success", "Поръчката е създадена"),
    ("checkout.error", "Грешка при създаване на поръчка"),
    ("checkout.empty_cart", "Количката е празна."),
    ("checkout.card.title", "Плащане с карта"),
    ("checkout.card.order_created", "Поръчката е създадена. Въведете данните на картата си."),
    ("checkout.cardholder_name", "Име на картодържател"),
    ("checkout.card_number", "Номер на карта"),
    ("checkout.exp_month", "Месец"),
    ("checkout.exp_year", "Година"),
    ("checkout.pay", "Плати"),
    ("checkout.pay.success", "Плащането е успешно"),
    ("checkout.pay.error", "Плащането е отказано"),
    ("checkout.payment_completed", "Плащането е завършено."),
    ("checkout.payment_cancelled", "Плащането беше отказано."),
    ("login.title", "Вход"),
    ("login.email", "Имейл"),
    ("login.password", "Парола"),
    ("login.submit", "Вход"),
    ("login.error", "Грешен имейл или парола"),
    ("login.register_cta", "Нямате акаунт?"),
    ("register.title", "Регистрация"),
    ("register.name", "Име"),
    ("register.email", "Имейл"),
    ("register.password", "Парола"),
    ("register.address", "Адрес"),
    ("register.phone", "Телефон"),
    ("register.submit", "Регистрация"),
    ("register.error", "Грешка при регистрация"),
    ("orders.title", "Моите поръчки"),
    ("orders.col.id", "№"),
    ("orders.col.status", "Статус"),
    ("orders.col.payment_status", "Плащане"),
    ("orders.col.total", "Общо"),
    ("orders.col.eta_days", "Срок (дни)"),
    ("product.base_price", "Базова цена"),
    ("product.base_prod_time", "Базово време за изработка (дни)"),
    ("product.dimensions", "Размери"),
    ("product.options", "Опции"),
    ("product.select_options", "Изберете опции"),
    ("product.quantity", "Количество"),
    ("product.add_to_cart", "Добави в количката"),
    ("product.added", "Добавено в количката"),
    ("product.recommended", "Подобни продукти"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_both_languages() {
        assert_eq!(Lang::En.t("cart.title"), "Cart");
        assert_eq!(Lang::Bg.t("cart.title"), "Количка");
    }

    #[test]
    fn test_missing_key_falls_back_to_key() {
        assert_eq!(Lang::En.t("no.such.key"), "no.such.key");
    }

    #[test]
    fn test_code_roundtrip() {
        assert_eq!(Lang::from_code("bg"), Lang::Bg);
        assert_eq!(Lang::from_code("en"), Lang::En);
        assert_eq!(Lang::from_code("xx"), Lang::En);
        assert_eq!(Lang::Bg.code(), "bg");
    }

    #[test]
    fn test_every_en_key_has_a_bg_translation() {
        for (key, _) in EN_STRINGS {
            assert!(
                BG_STRINGS.iter().any(|(k, _)| k == key),
                "missing bg translation for {key}"
            );
        }
    }
}
