use storefront::analytics::{format_currency, format_percentage};
use storefront::{AppContext, print_banner, setup_environment};

fn main() -> anyhow::Result<()> {
    // 1. 设置环境 (dotenv, 工作目录, 日志)
    let config = setup_environment()?;

    // 打印横幅
    print_banner();

    tracing::info!(environment = %config.environment, "PremiumVerse storefront starting...");

    // 2. 初始化应用上下文
    let context = AppContext::initialize(&config)?;

    // 3. 输出仪表盘摘要
    let stats = context.analytics.get_dashboard_stats();
    tracing::info!(
        revenue = %format_currency(stats.today.revenue),
        profit = %format_currency(stats.today.profit),
        orders = stats.today.orders,
        "Today"
    );
    tracing::info!(
        revenue = %format_currency(stats.month.revenue),
        margin = %format_percentage(stats.month.margin),
        orders = stats.month.orders,
        "This month"
    );
    tracing::info!(
        total = stats.products.total,
        active = stats.products.active,
        out_of_stock = stats.products.out_of_stock,
        featured = stats.products.featured,
        "Catalog"
    );
    if let Some(best) = &stats.best_seller {
        tracing::info!(
            name = %best.name,
            units = best.units_sold,
            revenue = %format_currency(best.revenue),
            "Best seller"
        );
    }

    // 4. 可选命令: export / import <file>
    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        Some("export") => {
            let products = context.export_products()?;
            let leads = context.export_leads()?;
            tracing::info!(products = %products.display(), leads = %leads.display(), "Exports written");
        }
        Some("import") => {
            let Some(path) = args.get(1) else {
                anyhow::bail!("usage: storefront import <products.csv>");
            };
            let input = std::fs::read_to_string(path)?;
            let outcome = context.import_products(&input)?;
            for rejected in &outcome.rejected {
                tracing::warn!(row = rejected.row, errors = ?rejected.errors, "Row rejected");
            }
        }
        Some(other) => anyhow::bail!("unknown command: {other}"),
        None => {}
    }

    Ok(())
}
