use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde_json::{Value, json};
use time::Date;
use time::macros::format_description;
use tracing::{info, warn};

use utopia_admin::bulk::{self, BulkError, CouponTemplate, SizePreset};
use utopia_admin::config::{AdminConfig, ConfigError, normalize_url};
use utopia_admin::entities::{
    ContactResponse, Coupon, Entity, Exam, ExamResult, ExamSection, ExamSectionType, Faq, JoinResponse, NewAdmin,
    Order, OrderItem, OrderStatus, Product, ProductImage, ProductVariant, RecordId, ResultsDetail, Student,
};
use utopia_admin::export::{self, ExportError, Exportable};
use utopia_admin::locale::Locale;
use utopia_admin::localized::{FaqStore, LocalizedFaq, LocalizedWriteError};
use utopia_admin::net::{ApiClient, ApiError, Remote, Session};
use utopia_admin::view::{CategoryFilter, DateRange, FetchError, FilterParams, ListView, MutationError, SortOrder};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("unauthorized, sign in again")]
    Unauthorized,
    #[error(transparent)]
    Api(ApiError),
    #[error(transparent)]
    Fetch(FetchError),
    #[error(transparent)]
    Mutation(MutationError),
    #[error(transparent)]
    Bulk(BulkError),
    #[error(transparent)]
    Localized(#[from] LocalizedWriteError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("could not read {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },
    #[error("{entity} needs --scope")]
    MissingScope { entity: &'static str },
    #[error("{action} is not supported for {entity}")]
    Unsupported { action: &'static str, entity: &'static str },
    #[error("no results for exam {0}")]
    NoResults(String),
}

impl From<ApiError> for CliError {
    fn from(e: ApiError) -> Self {
        if e.is_unauthorized() { Self::Unauthorized } else { Self::Api(e) }
    }
}

impl From<FetchError> for CliError {
    fn from(e: FetchError) -> Self {
        if e.unauthorized { Self::Unauthorized } else { Self::Fetch(e) }
    }
}

impl From<MutationError> for CliError {
    fn from(e: MutationError) -> Self {
        if e.is_unauthorized() { Self::Unauthorized } else { Self::Mutation(e) }
    }
}

impl From<BulkError> for CliError {
    fn from(e: BulkError) -> Self {
        match e {
            BulkError::Write(e) => e.into(),
            other => Self::Bulk(other),
        }
    }
}

// =============================================================================
// ARGUMENTS
// =============================================================================

#[derive(Parser, Debug)]
#[command(name = "utopia-admin", about = "Utopia admin dashboard client")]
struct Cli {
    #[arg(long, env = "ADMIN_API_URL")]
    api_url: Option<String>,

    #[arg(long, env = "ADMIN_DATA_URL")]
    data_url: Option<String>,

    #[arg(long, env = "ADMIN_DATA_KEY", hide_env_values = true)]
    data_key: Option<String>,

    #[arg(long, env = "ADMIN_TOKEN", hide_env_values = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum EntityKind {
    Exams,
    Sections,
    Students,
    Results,
    Products,
    Images,
    Variants,
    Orders,
    OrderItems,
    Coupons,
    Faqs,
    Contact,
    Join,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print filtered records as JSON lines.
    List {
        entity: EntityKind,
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Write filtered records to an .xlsx file.
    Export {
        entity: EntityKind,
        #[arg(long)]
        out: Option<PathBuf>,
        #[arg(long, default_value = "en")]
        locale: Locale,
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Create one record from a JSON object.
    Create {
        entity: EntityKind,
        #[arg(long)]
        data: String,
        #[arg(long)]
        scope: Option<String>,
    },
    /// Patch one record with a JSON object.
    Patch {
        entity: EntityKind,
        id: RecordId,
        #[arg(long)]
        data: String,
        #[arg(long)]
        scope: Option<String>,
    },
    /// Delete a record, or retire it for soft-delete entities.
    Remove {
        entity: EntityKind,
        id: RecordId,
        #[arg(long)]
        scope: Option<String>,
    },
    Results(ResultsCommand),
    Students(StudentsCommand),
    Coupons(CouponsCommand),
    Orders(OrdersCommand),
    Variants(VariantsCommand),
    Sections(SectionsCommand),
    Faqs(FaqsCommand),
    Admins(AdminsCommand),
}

#[derive(Args, Debug, Default)]
struct FilterArgs {
    #[arg(long)]
    query: Option<String>,
    #[arg(long)]
    category: Option<String>,
    /// First day included, YYYY-MM-DD.
    #[arg(long, value_parser = parse_date)]
    from: Option<Date>,
    /// Last day included, YYYY-MM-DD.
    #[arg(long, value_parser = parse_date)]
    to: Option<Date>,
    /// Include soft-deleted records.
    #[arg(long, default_value_t = false)]
    all: bool,
    /// newest or oldest
    #[arg(long)]
    sort: Option<SortOrder>,
    /// Parent id for nested collections.
    #[arg(long)]
    scope: Option<String>,
}

impl FilterArgs {
    fn params(&self, pass_mark: f64) -> FilterParams {
        FilterParams {
            query: self.query.clone().unwrap_or_default(),
            category: self.category.as_deref().map_or(CategoryFilter::All, CategoryFilter::parse),
            range: DateRange::new(self.from, self.to),
            show_inactive: self.all,
            sort: self.sort,
            pass_mark,
        }
    }
}

#[derive(Args, Debug)]
struct ResultsCommand {
    #[command(subcommand)]
    command: ResultsSubcommand,
}

#[derive(Subcommand, Debug)]
enum ResultsSubcommand {
    Stats {
        exam: String,
    },
    Export {
        exam: String,
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct StudentsCommand {
    #[command(subcommand)]
    command: StudentsSubcommand,
}

#[derive(Subcommand, Debug)]
enum StudentsSubcommand {
    /// Import `name,national_id,nominal_id` lines.
    Import { file: PathBuf },
}

#[derive(Args, Debug)]
struct CouponsCommand {
    #[command(subcommand)]
    command: CouponsSubcommand,
}

#[derive(Subcommand, Debug)]
enum CouponsSubcommand {
    Create {
        #[arg(long)]
        code: String,
        #[arg(long)]
        amount: f64,
        #[arg(long)]
        max: f64,
        #[arg(long)]
        min: f64,
        #[arg(long, default_value_t = false)]
        percentage: bool,
        #[arg(long, default_value_t = 1)]
        quantity: usize,
    },
}

#[derive(Args, Debug)]
struct OrdersCommand {
    #[command(subcommand)]
    command: OrdersSubcommand,
}

#[derive(Subcommand, Debug)]
enum OrdersSubcommand {
    /// Move an order to PLACED, SHIPPING, FINISHED or CANCELED.
    Status { id: i64, status: OrderStatus },
}

#[derive(Args, Debug)]
struct VariantsCommand {
    #[command(subcommand)]
    command: VariantsSubcommand,
}

#[derive(Subcommand, Debug)]
enum VariantsSubcommand {
    Preset {
        product: i64,
        #[arg(long)]
        kind: SizePreset,
        #[arg(long, default_value_t = 100)]
        stock: i64,
    },
}

#[derive(Args, Debug)]
struct SectionsCommand {
    #[command(subcommand)]
    command: SectionsSubcommand,
}

#[derive(Subcommand, Debug)]
enum SectionsSubcommand {
    Add { exam: String, types: Vec<ExamSectionType> },
}

#[derive(Args, Debug)]
struct FaqsCommand {
    #[command(subcommand)]
    command: FaqsSubcommand,
}

#[derive(Args, Debug)]
struct FaqText {
    #[arg(long)]
    question_en: String,
    #[arg(long)]
    answer_en: String,
    #[arg(long)]
    question_ar: String,
    #[arg(long)]
    answer_ar: String,
}

impl From<FaqText> for LocalizedFaq {
    fn from(text: FaqText) -> Self {
        Self {
            question_en: text.question_en,
            answer_en: text.answer_en,
            question_ar: text.question_ar,
            answer_ar: text.answer_ar,
        }
    }
}

#[derive(Subcommand, Debug)]
enum FaqsSubcommand {
    Create(FaqText),
    Update {
        id: i64,
        #[command(flatten)]
        text: FaqText,
    },
    Get {
        id: i64,
    },
    Delete {
        id: i64,
    },
}

#[derive(Args, Debug)]
struct AdminsCommand {
    #[command(subcommand)]
    command: AdminsSubcommand,
}

#[derive(Subcommand, Debug)]
enum AdminsSubcommand {
    Create {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
}

fn parse_date(raw: &str) -> Result<Date, String> {
    Date::parse(raw.trim(), format_description!("[year]-[month]-[day]"))
        .map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}

// =============================================================================
// MAIN
// =============================================================================

struct CliContext {
    remote: Arc<dyn Remote>,
    config: AdminConfig,
}

impl CliContext {
    fn view<E: Entity>(&self) -> ListView<E> {
        ListView::with_search_delay(Arc::clone(&self.remote), self.config.search_debounce())
    }
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let mut config = AdminConfig::from_env()?;
    if let Some(url) = normalize_url("--api-url", cli.api_url.as_deref())? {
        config.api_url = url;
    }
    if let Some(url) = normalize_url("--data-url", cli.data_url.as_deref())? {
        config.data_url = url;
    }
    config.data_key = cli.data_key.or(config.data_key);
    config.token = cli.token.or(config.token);

    let session = Session::new(config.token.clone());
    let client = ApiClient::new(&config, session)?;
    let ctx = CliContext { remote: Arc::new(client), config };

    match cli.command {
        Command::List { entity, filters } => run_list(&ctx, entity, &filters).await,
        Command::Export { entity, out, locale, filters } => run_export(&ctx, entity, out, locale, &filters).await,
        Command::Create { entity, data, scope } => run_create(&ctx, entity, &data, scope).await,
        Command::Patch { entity, id, data, scope } => run_patch(&ctx, entity, &id, &data, scope).await,
        Command::Remove { entity, id, scope } => run_remove(&ctx, entity, &id, scope).await,
        Command::Results(results) => run_results(&ctx, results).await,
        Command::Students(students) => run_students(&ctx, students).await,
        Command::Coupons(coupons) => run_coupons(&ctx, coupons).await,
        Command::Orders(orders) => run_orders(&ctx, orders).await,
        Command::Variants(variants) => run_variants(&ctx, variants).await,
        Command::Sections(sections) => run_sections(&ctx, sections).await,
        Command::Faqs(faqs) => run_faqs(&ctx, faqs).await,
        Command::Admins(admins) => run_admins(&ctx, admins).await,
    }
}

// =============================================================================
// GENERIC COMMANDS
// =============================================================================

async fn open_view<E: Entity>(ctx: &CliContext, scope: Option<String>) -> Result<ListView<E>, CliError> {
    let view = ctx.view::<E>();
    match scope {
        Some(scope) => view.set_scope(scope).await?,
        None if E::resource().requires_scope() => return Err(CliError::MissingScope { entity: E::PLURAL }),
        None => view.mount().await?,
    };
    Ok(view)
}

async fn filtered<E: Entity>(ctx: &CliContext, filters: &FilterArgs) -> Result<ListView<E>, CliError> {
    let view = open_view::<E>(ctx, filters.scope.clone()).await?;
    view.set_filter(filters.params(ctx.config.pass_threshold)).await;
    Ok(view)
}

async fn list<E: Entity>(ctx: &CliContext, filters: &FilterArgs) -> Result<(), CliError> {
    let view = filtered::<E>(ctx, filters).await?;
    for record in view.visible().await {
        println!("{}", serde_json::to_string(&record)?);
    }
    Ok(())
}

async fn run_list(ctx: &CliContext, entity: EntityKind, filters: &FilterArgs) -> Result<(), CliError> {
    match entity {
        EntityKind::Exams => list::<Exam>(ctx, filters).await,
        EntityKind::Sections => list::<ExamSection>(ctx, filters).await,
        EntityKind::Students => list::<Student>(ctx, filters).await,
        EntityKind::Results => list::<ExamResult>(ctx, filters).await,
        EntityKind::Products => list::<Product>(ctx, filters).await,
        EntityKind::Images => list::<ProductImage>(ctx, filters).await,
        EntityKind::Variants => list::<ProductVariant>(ctx, filters).await,
        EntityKind::Orders => list::<Order>(ctx, filters).await,
        EntityKind::OrderItems => list::<OrderItem>(ctx, filters).await,
        EntityKind::Coupons => list::<Coupon>(ctx, filters).await,
        EntityKind::Faqs => list::<Faq>(ctx, filters).await,
        EntityKind::Contact => list::<ContactResponse>(ctx, filters).await,
        EntityKind::Join => list::<JoinResponse>(ctx, filters).await,
    }
}

async fn export_view<E: Exportable>(
    ctx: &CliContext,
    out: Option<PathBuf>,
    locale: Locale,
    filters: &FilterArgs,
) -> Result<(), CliError> {
    let view = filtered::<E>(ctx, filters).await?;
    let sheet = view.export_sheet(locale).await;
    let path = out.unwrap_or_else(|| PathBuf::from(E::FILE_NAME));
    export::write_xlsx(&sheet, &path)?;
    println!("{}", path.display());
    Ok(())
}

async fn run_export(
    ctx: &CliContext,
    entity: EntityKind,
    out: Option<PathBuf>,
    locale: Locale,
    filters: &FilterArgs,
) -> Result<(), CliError> {
    match entity {
        EntityKind::Students => export_view::<Student>(ctx, out, locale, filters).await,
        EntityKind::Results => export_view::<ExamResult>(ctx, out, locale, filters).await,
        EntityKind::Orders => export_view::<Order>(ctx, out, locale, filters).await,
        EntityKind::Coupons => export_view::<Coupon>(ctx, out, locale, filters).await,
        EntityKind::Contact => export_view::<ContactResponse>(ctx, out, locale, filters).await,
        EntityKind::Join => export_view::<JoinResponse>(ctx, out, locale, filters).await,
        other => Err(CliError::Unsupported { action: "export", entity: entity_name(other) }),
    }
}

async fn create<E: Entity>(ctx: &CliContext, data: &str, scope: Option<String>) -> Result<(), CliError> {
    let fields: Value = serde_json::from_str(data)?;
    let view = open_view::<E>(ctx, scope).await?;
    view.create(&fields).await?;
    report(&view).await;
    Ok(())
}

async fn run_create(ctx: &CliContext, entity: EntityKind, data: &str, scope: Option<String>) -> Result<(), CliError> {
    match entity {
        EntityKind::Exams => create::<Exam>(ctx, data, scope).await,
        EntityKind::Sections => create::<ExamSection>(ctx, data, scope).await,
        EntityKind::Students => create::<Student>(ctx, data, scope).await,
        EntityKind::Products => create::<Product>(ctx, data, scope).await,
        EntityKind::Images => create::<ProductImage>(ctx, data, scope).await,
        EntityKind::Variants => create::<ProductVariant>(ctx, data, scope).await,
        EntityKind::Coupons => create::<Coupon>(ctx, data, scope).await,
        other => Err(CliError::Unsupported { action: "create", entity: entity_name(other) }),
    }
}

async fn patch<E: Entity>(ctx: &CliContext, id: &RecordId, data: &str, scope: Option<String>) -> Result<(), CliError> {
    let fields: Value = serde_json::from_str(data)?;
    let view = open_view::<E>(ctx, scope).await?;
    view.update(id, fields).await?;
    report(&view).await;
    Ok(())
}

async fn run_patch(
    ctx: &CliContext,
    entity: EntityKind,
    id: &RecordId,
    data: &str,
    scope: Option<String>,
) -> Result<(), CliError> {
    match entity {
        EntityKind::Exams => patch::<Exam>(ctx, id, data, scope).await,
        EntityKind::Students => patch::<Student>(ctx, id, data, scope).await,
        EntityKind::Products => patch::<Product>(ctx, id, data, scope).await,
        EntityKind::Images => patch::<ProductImage>(ctx, id, data, scope).await,
        EntityKind::Variants => patch::<ProductVariant>(ctx, id, data, scope).await,
        EntityKind::Orders => patch::<Order>(ctx, id, data, scope).await,
        EntityKind::Coupons => patch::<Coupon>(ctx, id, data, scope).await,
        EntityKind::Contact => patch::<ContactResponse>(ctx, id, data, scope).await,
        EntityKind::Join => patch::<JoinResponse>(ctx, id, data, scope).await,
        other => Err(CliError::Unsupported { action: "patch", entity: entity_name(other) }),
    }
}

async fn remove<E: Entity>(ctx: &CliContext, id: &RecordId, scope: Option<String>) -> Result<(), CliError> {
    let view = open_view::<E>(ctx, scope).await?;
    view.remove(id).await?;
    report(&view).await;
    Ok(())
}

async fn run_remove(ctx: &CliContext, entity: EntityKind, id: &RecordId, scope: Option<String>) -> Result<(), CliError> {
    match entity {
        EntityKind::Exams => remove::<Exam>(ctx, id, scope).await,
        EntityKind::Sections => remove::<ExamSection>(ctx, id, scope).await,
        EntityKind::Students => remove::<Student>(ctx, id, scope).await,
        EntityKind::Products => remove::<Product>(ctx, id, scope).await,
        EntityKind::Images => remove::<ProductImage>(ctx, id, scope).await,
        EntityKind::Variants => remove::<ProductVariant>(ctx, id, scope).await,
        EntityKind::Coupons => remove::<Coupon>(ctx, id, scope).await,
        EntityKind::Contact => remove::<ContactResponse>(ctx, id, scope).await,
        EntityKind::Join => remove::<JoinResponse>(ctx, id, scope).await,
        EntityKind::Faqs => {
            FaqStore::new(Arc::clone(&ctx.remote)).delete(id).await?;
            Ok(())
        }
        other => Err(CliError::Unsupported { action: "remove", entity: entity_name(other) }),
    }
}

/// Log the notices a view queued during the command.
async fn report<E: Entity>(view: &ListView<E>) {
    for notice in view.drain_notices().await {
        if notice.is_error() {
            warn!(%notice, "request failed");
        } else {
            info!(%notice, "done");
        }
    }
}

fn entity_name(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Exams => Exam::PLURAL,
        EntityKind::Sections => ExamSection::PLURAL,
        EntityKind::Students => Student::PLURAL,
        EntityKind::Results => ExamResult::PLURAL,
        EntityKind::Products => Product::PLURAL,
        EntityKind::Images => ProductImage::PLURAL,
        EntityKind::Variants => ProductVariant::PLURAL,
        EntityKind::Orders => Order::PLURAL,
        EntityKind::OrderItems => OrderItem::PLURAL,
        EntityKind::Coupons => Coupon::PLURAL,
        EntityKind::Faqs => Faq::PLURAL,
        EntityKind::Contact => ContactResponse::PLURAL,
        EntityKind::Join => JoinResponse::PLURAL,
    }
}

// =============================================================================
// SCREEN COMMANDS
// =============================================================================

async fn run_results(ctx: &CliContext, results: ResultsCommand) -> Result<(), CliError> {
    match results.command {
        ResultsSubcommand::Stats { exam } => {
            let view = open_view::<ExamResult>(ctx, Some(exam.clone())).await?;
            view.update_filter(|f| f.pass_mark = ctx.config.pass_threshold).await;
            let stats = view.stats().await.ok_or(CliError::NoResults(exam))?;
            let rendered = json!({
                "count": stats.count,
                "average": stats.average,
                "max": stats.max,
                "min": stats.min,
                "pass_rate": stats.pass_rate,
                "threshold": ctx.config.pass_threshold,
            });
            println!("{}", serde_json::to_string_pretty(&rendered)?);
            Ok(())
        }
        ResultsSubcommand::Export { exam, out } => {
            let body = ctx.remote.fetch(&ResultsDetail::resource(&exam)).await?;
            let detail: ResultsDetail = serde_json::from_value(body)?;
            let sheet = export::results_sheet(&detail);
            let path = out.unwrap_or_else(|| PathBuf::from(export::results_file_name(&exam)));
            export::write_xlsx(&sheet, &path)?;
            println!("{}", path.display());
            Ok(())
        }
    }
}

async fn run_students(ctx: &CliContext, students: StudentsCommand) -> Result<(), CliError> {
    match students.command {
        StudentsSubcommand::Import { file } => {
            let text = read_file(&file)?;
            let view = ctx.view::<Student>();
            let count = bulk::import_students(&view, &text).await?;
            report(&view).await;
            println!("{count}");
            Ok(())
        }
    }
}

async fn run_coupons(ctx: &CliContext, coupons: CouponsCommand) -> Result<(), CliError> {
    match coupons.command {
        CouponsSubcommand::Create { code, amount, max, min, percentage, quantity } => {
            let template = CouponTemplate { code, amount, max_discount: max, min_purchase: min, is_percentage: percentage };
            let view = ctx.view::<Coupon>();
            for code in bulk::create_coupons(&view, &template, quantity).await? {
                println!("{code}");
            }
            report(&view).await;
            Ok(())
        }
    }
}

async fn run_orders(ctx: &CliContext, orders: OrdersCommand) -> Result<(), CliError> {
    match orders.command {
        OrdersSubcommand::Status { id, status } => {
            let view = open_view::<Order>(ctx, None).await?;
            view.set_status(&RecordId::Int(id), Order::status_patch(status)).await?;
            report(&view).await;
            Ok(())
        }
    }
}

async fn run_variants(ctx: &CliContext, variants: VariantsCommand) -> Result<(), CliError> {
    match variants.command {
        VariantsSubcommand::Preset { product, kind, stock } => {
            let view = open_view::<ProductVariant>(ctx, Some(product.to_string())).await?;
            let count = bulk::apply_preset(&view, product, kind, stock).await?;
            report(&view).await;
            println!("{count}");
            Ok(())
        }
    }
}

async fn run_sections(ctx: &CliContext, sections: SectionsCommand) -> Result<(), CliError> {
    match sections.command {
        SectionsSubcommand::Add { exam, types } => {
            let view = open_view::<ExamSection>(ctx, Some(exam)).await?;
            let count = bulk::add_sections(&view, &types).await?;
            report(&view).await;
            println!("{count}");
            Ok(())
        }
    }
}

async fn run_faqs(ctx: &CliContext, faqs: FaqsCommand) -> Result<(), CliError> {
    let store = FaqStore::new(Arc::clone(&ctx.remote));
    match faqs.command {
        FaqsSubcommand::Create(text) => store.create(&text.into()).await?,
        FaqsSubcommand::Update { id, text } => store.update(&RecordId::Int(id), &text.into()).await?,
        FaqsSubcommand::Get { id } => {
            let faq = store.get(&RecordId::Int(id)).await?;
            let rendered = json!({
                "id": id,
                "en": { "question": faq.question_en, "answer": faq.answer_en },
                "ar": { "question": faq.question_ar, "answer": faq.answer_ar },
            });
            println!("{}", serde_json::to_string_pretty(&rendered)?);
        }
        FaqsSubcommand::Delete { id } => store.delete(&RecordId::Int(id)).await?,
    }
    Ok(())
}

async fn run_admins(ctx: &CliContext, admins: AdminsCommand) -> Result<(), CliError> {
    match admins.command {
        AdminsSubcommand::Create { username, password } => {
            let admin = NewAdmin::new(username, password);
            ctx.remote.insert(&NewAdmin::resource(), vec![serde_json::to_value(&admin)?]).await?;
            info!(username = %admin.username, "admin created");
            Ok(())
        }
    }
}

fn read_file(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::Read { path: path.to_path_buf(), source })
}
