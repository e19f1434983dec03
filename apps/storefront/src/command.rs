//! # Console Commands
//!
//! One line of input per user action.
//!
//! ```text
//! list                      show the catalog again
//! view <n|id>               open a product preview
//! buy                       toggle the previewed product in the basket
//! basket                    open the basket
//! remove <n>                remove basket row n
//! order                     start checkout
//! set <field> <value...>    fill a form field (payment, address, email, phone)
//! next                      submit the current form
//! back                      return to the shipment form
//! cancel                    abandon checkout (basket is kept)
//! close                     close the modal
//! help                      this text
//! quit
//! ```

use std::fmt;
use std::str::FromStr;

use larek_core::OrderField;

use crate::error::AppError;

pub const HELP: &str = "\
Команды:
  list                   каталог
  view <n|id>            карточка товара
  buy                    купить / убрать из корзины
  basket                 корзина
  remove <n>             удалить строку n из корзины
  order                  оформить заказ
  set <поле> <значение>  payment | address | email | phone
  next                   далее / оплатить
  back                   назад к адресу
  cancel                 отменить оформление
  close                  закрыть окно
  quit                   выход
";

/// Reference to a product or basket row: 1-based position or product id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemRef {
    Position(usize),
    Id(String),
}

impl ItemRef {
    fn parse(s: &str) -> Self {
        match s.parse::<usize>() {
            Ok(n) if n > 0 => ItemRef::Position(n),
            _ => ItemRef::Id(s.to_string()),
        }
    }

    /// Resolves against an ordered list of ids.
    pub fn resolve<'a>(&'a self, ids: &'a [String]) -> Option<&'a str> {
        match self {
            ItemRef::Position(n) => n.checked_sub(1).and_then(|i| ids.get(i)).map(String::as_str),
            ItemRef::Id(id) => ids.iter().find(|i| *i == id).map(String::as_str),
        }
    }
}

impl fmt::Display for ItemRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemRef::Position(n) => write!(f, "#{}", n),
            ItemRef::Id(id) => f.write_str(id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    View(ItemRef),
    Buy,
    Basket,
    Remove(ItemRef),
    Order,
    Set(OrderField, String),
    Next,
    Back,
    Cancel,
    Close,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = AppError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();
        let missing = || AppError::Command(format!("{}: missing argument", word));

        let command = match word {
            "list" | "ls" => Command::List,
            "view" | "v" if !rest.is_empty() => Command::View(ItemRef::parse(rest)),
            "buy" | "b" => Command::Buy,
            "basket" => Command::Basket,
            "remove" | "rm" if !rest.is_empty() => Command::Remove(ItemRef::parse(rest)),
            "order" => Command::Order,
            "set" => {
                let (field, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                if field.is_empty() {
                    return Err(missing());
                }
                Command::Set(field.parse()?, value.trim().to_string())
            }
            "next" | "n" => Command::Next,
            "back" => Command::Back,
            "cancel" => Command::Cancel,
            "close" | "x" => Command::Close,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            "view" | "v" | "remove" | "rm" => return Err(missing()),
            other => return Err(AppError::Command(other.to_string())),
        };
        Ok(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!("list".parse::<Command>().unwrap(), Command::List);
        assert_eq!(
            "view 2".parse::<Command>().unwrap(),
            Command::View(ItemRef::Position(2))
        );
        assert_eq!(
            "view c101ab44".parse::<Command>().unwrap(),
            Command::View(ItemRef::Id("c101ab44".into()))
        );
        assert_eq!(
            "set address  ул. Пушкина, 1 ".parse::<Command>().unwrap(),
            Command::Set(OrderField::Address, "ул. Пушкина, 1".into())
        );
        assert_eq!(
            "set payment".parse::<Command>().unwrap(),
            Command::Set(OrderField::Payment, String::new())
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!("view".parse::<Command>(), Err(AppError::Command(_))));
        assert!(matches!("dance".parse::<Command>(), Err(AppError::Command(_))));
        assert!(matches!("set".parse::<Command>(), Err(AppError::Command(_))));
        assert!(matches!("set items 1".parse::<Command>(), Err(AppError::Core(_))));
    }

    #[test]
    fn test_item_ref_resolution() {
        let ids = vec!["a".to_string(), "b".to_string()];
        assert_eq!(ItemRef::Position(2).resolve(&ids), Some("b"));
        assert_eq!(ItemRef::Position(3).resolve(&ids), None);
        assert_eq!(ItemRef::Id("a".into()).resolve(&ids), Some("a"));
        assert_eq!(ItemRef::parse("0"), ItemRef::Id("0".into()));
    }

    #[test]
    fn test_item_ref_display() {
        assert_eq!(ItemRef::Position(99).to_string(), "#99");
        assert_eq!(ItemRef::Id("c101ab44".into()).to_string(), "c101ab44");
        assert_eq!("cancel".parse::<Command>().unwrap(), Command::Cancel);
    }
}
