//! # Console View
//!
//! Plain-text renderer for every storefront screen.

use std::cell::RefCell;
use std::io::Write;

use tracing::warn;

use crate::view::{GalleryArgs, HeaderArgs, ModalContent, OrderFormArgs, PageArgs, Render};
use larek_core::{OrderField, OrderStep};

/// Writes screens to any `Write` sink (stdout in the binary, a buffer in
/// tests).
pub struct ConsoleView<W: Write> {
    out: RefCell<W>,
}

impl<W: Write> ConsoleView<W> {
    pub fn new(out: W) -> Self {
        ConsoleView {
            out: RefCell::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }

    fn write(&self, text: &str) {
        let mut out = self.out.borrow_mut();
        if let Err(err) = out.write_all(text.as_bytes()).and_then(|()| out.flush()) {
            warn!(error = %err, "Console write failed");
        }
    }
}

impl ConsoleView<Vec<u8>> {
    /// Everything written so far.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.out.borrow()).into_owned()
    }
}

impl<W: Write> Render<PageArgs> for ConsoleView<W> {
    fn render(&self, _args: PageArgs) {
        // The terminal has nothing to scroll-lock.
    }
}

impl<W: Write> Render<HeaderArgs> for ConsoleView<W> {
    fn render(&self, args: HeaderArgs) {
        self.write(&format!("[Корзина: {}]\n", args.counter));
    }
}

impl<W: Write> Render<GalleryArgs> for ConsoleView<W> {
    fn render(&self, args: GalleryArgs) {
        let mut text = String::from("=== Каталог ===\n");
        for (i, card) in args.items.iter().enumerate() {
            text.push_str(&format!(
                "{:>2}. [{}] {} - {}  ({})\n",
                i + 1,
                card.category.title(),
                card.title,
                card.price,
                card.id
            ));
        }
        self.write(&text);
    }
}

impl<W: Write> Render<ModalContent> for ConsoleView<W> {
    fn render(&self, args: ModalContent) {
        let text = match args {
            ModalContent::Preview(preview) => {
                let button = if preview.is_disabled {
                    format!("({})", preview.button_text)
                } else {
                    format!("[{}]", preview.button_text)
                };
                format!(
                    "--- {} ---\n{}\n{}\n{}\n{}\n",
                    preview.card.title,
                    preview.card.category.title(),
                    preview.description,
                    preview.card.price,
                    button
                )
            }
            ModalContent::Basket(basket) => {
                let mut text = String::from("--- Корзина ---\n");
                for row in &basket.items {
                    text.push_str(&format!("{}. {} - {}\n", row.index, row.title, row.price));
                }
                if basket.items.is_empty() {
                    text.push_str("Корзина пуста\n");
                }
                text.push_str(&format!("Итого: {}\n", basket.price));
                text
            }
            ModalContent::Order(form) => render_form(&form),
            ModalContent::Success(success) => {
                format!("--- Заказ оформлен ---\n{}\n", success.description)
            }
        };
        self.write(&text);
    }
}

fn render_form(form: &OrderFormArgs) -> String {
    let invoice = &form.invoice;
    let (title, fields, submit) = match form.step {
        OrderStep::Shipment => (
            "Способ оплаты и адрес",
            [
                (
                    OrderField::Payment,
                    invoice.payment.map(|p| p.to_string()).unwrap_or_default(),
                ),
                (OrderField::Address, invoice.address.clone()),
            ],
            "Далее",
        ),
        OrderStep::Contacts => (
            "Контакты",
            [
                (OrderField::Email, invoice.email.clone()),
                (OrderField::Phone, invoice.phone.clone()),
            ],
            "Оплатить",
        ),
    };

    let mut text = format!("--- {} ---\n", title);
    for (field, value) in fields {
        text.push_str(&format!("{}: {}\n", field, value));
        if let Some(message) = form.errors.get(&field) {
            text.push_str(&format!("  ! {}\n", message));
        }
    }
    if form.is_disabled {
        text.push_str(&format!("({})\n", submit));
    } else {
        text.push_str(&format!("[{}]\n", submit));
    }
    text
}
