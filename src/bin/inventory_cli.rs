use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use serde::Serialize;

use inventory_po_api::{
    config::{self, AppConfig},
    db::{self, DatabaseAccess, DbPool},
    errors::ServiceError,
    queries::{
        ClientView, GetPurchaseOrderDetailQuery, ListClientsQuery, ListPartsQuery,
        ListPurchaseOrdersQuery, PartView, PurchaseOrderDetail, PurchaseOrderSummary, Query,
    },
    services::{OrderLineRequest, OrderSubmissionService, SubmitOrderRequest},
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let context = CliContext::initialize().await?;

    match cli.command {
        Commands::Parts => handle_parts_command(&context, cli.json).await?,
        Commands::Clients => handle_clients_command(&context, cli.json).await?,
        Commands::Orders(command) => handle_orders_command(&context, command, cli.json).await?,
    }

    Ok(())
}

#[derive(Parser)]
#[command(
    name = "inventory",
    about = "Inventory CLI for parts, clients and purchase orders",
    version
)]
struct Cli {
    #[arg(
        long,
        global = true,
        action = ArgAction::SetTrue,
        help = "Render command output as pretty JSON"
    )]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List parts with price and stock on hand
    Parts,
    /// List clients with their balance
    Clients,
    #[command(subcommand)]
    Orders(OrdersCommands),
}

#[derive(Subcommand)]
enum OrdersCommands {
    /// List purchase orders
    List,
    /// Show one purchase order with its lines and total
    Show(OrdersShowArgs),
    /// Submit a new purchase order
    Submit(OrdersSubmitArgs),
}

#[derive(Args)]
struct OrdersShowArgs {
    #[arg(help = "Purchase order number")]
    po_no: i32,
}

#[derive(Args)]
struct OrdersSubmitArgs {
    #[arg(long, help = "Client placing the order")]
    client: i32,
    #[arg(
        long = "line",
        required = true,
        value_parser = parse_line_arg,
        help = "Order line as PART:QTY; repeat for more lines"
    )]
    lines: Vec<(i32, i64)>,
}

fn parse_line_arg(raw: &str) -> Result<(i32, i64), String> {
    let (part, qty) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected PART:QTY, got '{raw}'"))?;
    let part = part
        .trim()
        .parse::<i32>()
        .map_err(|e| format!("invalid part number '{part}': {e}"))?;
    let qty = qty
        .trim()
        .parse::<i64>()
        .map_err(|e| format!("invalid quantity '{qty}': {e}"))?;
    Ok((part, qty))
}

struct CliContext {
    config: AppConfig,
    db: Arc<DbPool>,
}

impl CliContext {
    async fn initialize() -> Result<Self> {
        let config = config::load_config().context("failed to load application config")?;
        config::init_tracing(config.log_level(), config.log_json);

        let db_pool = db::establish_connection_from_app_config(&config)
            .await
            .context("failed to connect to database")?;
        if config.auto_migrate {
            db::run_migrations(&db_pool)
                .await
                .context("failed to run migrations")?;
        }

        Ok(Self {
            config,
            db: Arc::new(db_pool),
        })
    }

    fn db_access(&self) -> DatabaseAccess {
        DatabaseAccess::new(self.db.clone())
    }

    fn order_service(&self) -> OrderSubmissionService {
        OrderSubmissionService::from_config(self.db.clone(), &self.config)
    }
}

async fn handle_parts_command(context: &CliContext, json: bool) -> Result<()> {
    let parts = ListPartsQuery
        .execute(&context.db_access())
        .await
        .context("failed to list parts")?;

    if json {
        print_json(&parts)?;
    } else {
        println!("Parts ({})", parts.len());
        parts.iter().for_each(render_part);
    }
    Ok(())
}

async fn handle_clients_command(context: &CliContext, json: bool) -> Result<()> {
    let clients = ListClientsQuery
        .execute(&context.db_access())
        .await
        .context("failed to list clients")?;

    if json {
        print_json(&clients)?;
    } else {
        println!("Clients ({})", clients.len());
        clients.iter().for_each(render_client);
    }
    Ok(())
}

async fn handle_orders_command(
    context: &CliContext,
    command: OrdersCommands,
    json: bool,
) -> Result<()> {
    match command {
        OrdersCommands::List => {
            let orders = ListPurchaseOrdersQuery
                .execute(&context.db_access())
                .await
                .context("failed to list purchase orders")?;
            if json {
                print_json(&orders)?;
            } else {
                println!("Purchase orders ({})", orders.len());
                orders.iter().for_each(render_order_summary);
            }
        }
        OrdersCommands::Show(args) => {
            let detail = GetPurchaseOrderDetailQuery { po_no: args.po_no }
                .execute(&context.db_access())
                .await
                .map_err(describe_error)?;
            if json {
                print_json(&detail)?;
            } else {
                render_order_detail(&detail);
            }
        }
        OrdersCommands::Submit(args) => {
            let request = SubmitOrderRequest {
                client_id: Some(args.client),
                lines: Some(
                    args.lines
                        .into_iter()
                        .map(|(part, qty)| OrderLineRequest::new(part, qty))
                        .collect(),
                ),
            };
            let submitted = context
                .order_service()
                .submit_order(request)
                .await
                .map_err(describe_error)?;
            if json {
                print_json(&submitted)?;
            } else {
                println!("Created purchase order {}", submitted.po_no);
            }
        }
    }
    Ok(())
}

/// Rejections carry their code so scripts can tell them apart
fn describe_error(err: ServiceError) -> anyhow::Error {
    anyhow!("{} ({})", err.response_message(), err.code())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn render_part(part: &PartView) {
    println!(
        "- Part {} • {} • price {} • on hand {}",
        part.part_no, part.description, part.price, part.quantity_on_hand
    );
}

fn render_client(client: &ClientView) {
    println!(
        "- Client {} • {} • {} • balance {}",
        client.client_id, client.name, client.phone, client.balance
    );
}

fn render_order_summary(order: &PurchaseOrderSummary) {
    println!(
        "- PO {} • client {} ({}) • {} • {}",
        order.po_no,
        order.client_id,
        order.client_name,
        order.order_date.format("%Y-%m-%d %H:%M"),
        order.status
    );
}

fn render_order_detail(order: &PurchaseOrderDetail) {
    println!(
        "PO {} • {} • {}",
        order.po_no,
        order.order_date.format("%Y-%m-%d %H:%M"),
        order.status
    );
    println!(
        "Client {} • {} • {}",
        order.client_id, order.client_name, order.client_phone
    );
    for line in &order.lines {
        println!(
            "  {}. part {} {} • {} x {} = {}",
            line.line_no, line.part_no, line.description, line.qty, line.price, line.extended_price
        );
    }
    println!("Total {}", order.total);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_part_and_quantity() {
        assert_eq!(parse_line_arg("3:12"), Ok((3, 12)));
        assert_eq!(parse_line_arg(" 1 : 5 "), Ok((1, 5)));
    }

    #[test]
    fn rejects_malformed_lines() {
        assert!(parse_line_arg("3").is_err());
        assert!(parse_line_arg("x:1").is_err());
        assert!(parse_line_arg("1:y").is_err());
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
