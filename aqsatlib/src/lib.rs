//! aqsatlib — расчёт графиков рассрочки (первоначальный взнос, наценка/аннуитет, округление)
//! и вывод их в CSV, XML, JSON или текстовой таблицей.

pub mod calculator;
pub mod error;
pub mod model;
pub mod plans;
pub mod settings;
pub mod traits;

pub mod formats {
    pub mod csv;
    pub mod json;
    pub mod table;
    pub mod xml;
}

pub use calculator::calculate;
