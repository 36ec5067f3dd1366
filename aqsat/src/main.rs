use aqsatlib::{
    error::{AqsatError, Result},
    formats::{csv::Csv, json::Json, table::Table, xml::SimpleXml},
    model::InterestModel,
    settings::{Amount, CalcMode, Settings},
    traits::WriteFormat,
};
use clap::{Parser, ValueEnum};
use rust_decimal::Decimal;
use std::fs::{self, File};
use std::io::{self, Write};
use tracing_subscriber::EnvFilter;

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Fmt {
    Table,
    Csv,
    Xml,
    Json,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Model {
    Markup,
    Apr,
}

impl From<Model> for InterestModel {
    fn from(m: Model) -> Self {
        match m {
            Model::Markup => InterestModel::Markup,
            Model::Apr => InterestModel::Apr,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name="aqsat", version, about="Расчёт графика рассрочки для цены товара")]
struct Cli {
    /// Цена товара
    #[arg(short='p', long="price", required_unless_present="client_config")]
    price: Option<Decimal>,

    /// Файл настроек TOML (по умолчанию — встроенные значения)
    #[arg(short='s', long="settings")]
    settings: Option<String>,

    /// Выходной файл (по умолчанию stdout)
    #[arg(short='o', long="output")]
    output: Option<String>,

    /// Формат выхода
    #[arg(long="format", value_enum, default_value="table")]
    format: Fmt,

    /// Модель процентов
    #[arg(long="model", value_enum)]
    model: Option<Model>,

    /// Шаг округления ежемесячного платежа: 0, 1000 или 10000
    #[arg(long="rounding")]
    rounding: Option<u64>,

    /// Первоначальный взнос, % от цены
    #[arg(long="down-percent")]
    down_percent: Option<Decimal>,

    /// Первоначальный взнос, фиксированная сумма
    #[arg(long="down-fixed")]
    down_fixed: Option<Decimal>,

    /// Сроки через запятую (простой режим)
    #[arg(long="months")]
    months: Option<String>,

    /// Ставка в месяц, % (простой режим)
    #[arg(long="rate")]
    rate: Option<Decimal>,

    /// Файл с тарифами `месяцы|ставка` (включает расширенный режим)
    #[arg(long="plan-file")]
    plan_file: Option<String>,

    /// Вывести JSON-конфиг для пересчёта на клиенте вместо графика
    #[arg(long="client-config")]
    client_config: bool,

    /// Подробный лог в stderr
    #[arg(short='v', long="verbose")]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = load_settings(&cli)?;
    let engine = settings.engine()?;

    // writer
    let mut writer: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(File::create(path)?),
        None => Box::new(io::stdout()),
    };

    if cli.client_config {
        writeln!(writer, "{}", engine.client_config().to_json()?)?;
        return writer.flush().map_err(AqsatError::from);
    }

    let price = cli
        .price
        .ok_or_else(|| AqsatError::Parse("--price is required".into()))?;
    let Some(schedule) = engine.quote(price)? else {
        tracing::info!(%price, "nothing to show for this price");
        return Ok(());
    };

    match cli.format {
        Fmt::Table => Table::write(&mut writer, &schedule),
        Fmt::Csv => Csv::write(&mut writer, &schedule),
        Fmt::Xml => SimpleXml::write(&mut writer, &schedule),
        Fmt::Json => Json::write(&mut writer, &schedule),
    }?;

    writer.flush().map_err(AqsatError::from)
}

fn load_settings(cli: &Cli) -> Result<Settings> {
    let mut settings = match &cli.settings {
        Some(path) => Settings::from_toml_str(&fs::read_to_string(path)?)?,
        None => Settings::default(),
    };

    if let Some(m) = cli.model {
        settings.calc_type = m.into();
    }
    if let Some(r) = cli.rounding {
        settings.rounding = r;
    }
    if let Some(p) = cli.down_percent {
        settings.down_percent = p;
    }
    if let Some(f) = cli.down_fixed {
        settings.down_fixed = Amount::Number(f);
    }
    if let Some(m) = &cli.months {
        settings.calc_mode = CalcMode::Simple;
        settings.months = m.clone();
    }
    if let Some(r) = cli.rate {
        settings.monthly_rate = r;
    }
    if let Some(path) = &cli.plan_file {
        settings.calc_mode = CalcMode::Advanced;
        settings.advanced_plan = fs::read_to_string(path)?;
    }

    settings.sanitize()
}

fn init_tracing(verbose: bool) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if verbose { "debug" } else { "warn" };
        format!("aqsat={level},aqsatlib={level}").into()
    });
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .init();
}
