use crate::{
    AssetCommand, CategoryCommand, ChecklistCommand, Commands, Context, LocationCommand,
    OutputMode, RoomCommand, emit_success,
};
use chrono::NaiveDate;
use owo_colors::OwoColorize;
use serde::Serialize;
use studioledger::config::{self, LedgerConfig};
use studioledger::ledger::Ledger;
use studioledger::model::{
    AssetDraft, AssetLog, AssetPatch, AssetStatus, AuthEvent, ChecklistDraft, Location,
    LocationPatch, LogKind, Room, RoomAsset, RoomPatch, WAREHOUSE_ROOM_ID,
};
use studioledger::storage::SqliteStore;
use studioledger::ui::{self, Icons, TableBuilder, banner, section, stats_table, status_label, success, summary_row};
use studioledger::{Session, output::is_quiet};

pub fn run(command: Commands, ctx: &Context) -> anyhow::Result<()> {
    match command {
        Commands::Init { force } => run_init(ctx, force),
        Commands::Location { action } => run_location(&mut open_session(ctx)?, ctx, action),
        Commands::Room { action } => run_room(&mut open_session(ctx)?, ctx, action),
        Commands::Asset { action } => run_asset(&mut open_session(ctx)?, ctx, action),
        Commands::Assign { asset, room } => run_assign(&mut open_session(ctx)?, ctx, asset, room),
        Commands::Move { asset, to } => run_move(&mut open_session(ctx)?, ctx, asset, to),
        Commands::Unassign { id } => run_unassign(&mut open_session(ctx)?, ctx, id),
        Commands::Checklist { action } => run_checklist(&mut open_session(ctx)?, ctx, action),
        Commands::Category { action } => run_category(&mut open_session(ctx)?, ctx, action),
        Commands::Logs { asset, kind, limit } => run_logs(&open_session(ctx)?, ctx, asset, kind, limit),
        Commands::Login => run_auth(&mut open_session(ctx)?, ctx, AuthEvent::Login),
        Commands::Logout => run_auth(&mut open_session(ctx)?, ctx, AuthEvent::Logout),
        Commands::Stats => run_stats(&open_session(ctx)?, ctx),
    }
}

/// Open the ledger; pending writes are flushed when the session drops
fn open_session(ctx: &Context) -> anyhow::Result<Session> {
    config::ensure_db_dir(&ctx.database)?;
    Ok(Session::open(&ctx.database, ctx.debounce)?)
}

/// Catalog changes are limited to admins, as in the admin console
fn require_manager(ctx: &Context) -> anyhow::Result<()> {
    if !ctx.operator.role.can_manage() {
        anyhow::bail!(
            "{} ({}) is not allowed to change the catalog",
            ctx.operator.name,
            ctx.operator.role
        );
    }
    Ok(())
}

fn emit<T: Serialize>(ctx: &Context, command: &str, data: &T) -> anyhow::Result<()> {
    emit_success(ctx.output_mode, command, serde_json::to_value(data)?)
}

fn print_table(table: TableBuilder) {
    if table.is_empty() {
        println!("{} Nothing to show.", Icons::EMPTY);
    } else {
        println!("{}", table.build());
    }
}

// ========== init ==========

fn run_init(ctx: &Context, force: bool) -> anyhow::Result<()> {
    let config = LedgerConfig {
        database: Some(ctx.database.to_string_lossy().to_string()),
        operator: Some(ctx.operator.name.clone()),
        role: Some(ctx.operator.role.to_string()),
        debounce_ms: Some(ctx.debounce.as_millis() as u64),
    };
    config::write_config(&ctx.config_path, &config, force)?;
    config::ensure_db_dir(&ctx.database)?;

    let mut store = SqliteStore::open(&ctx.database)?;
    if store.count_keys()? == 0 {
        Ledger::new().flush(&mut store)?;
    }
    tracing::info!("Initialized ledger at {:?}", ctx.database);

    if ctx.output_mode.is_human() {
        banner(
            &format!("{} {}", Icons::DATABASE, "Studioledger".bold()),
            &format!("Version {}", env!("CARGO_PKG_VERSION")),
        );
        success(&format!("Config written to {}", ctx.config_path.display()));
        ui::info("Database", &ctx.database.display().to_string());
    } else {
        emit(ctx, "init", &serde_json::json!({
            "config": ctx.config_path,
            "database": ctx.database,
        }))?;
    }
    Ok(())
}

// ========== locations ==========

fn run_location(session: &mut Session, ctx: &Context, action: LocationCommand) -> anyhow::Result<()> {
    match action {
        LocationCommand::Add { name, address } => {
            require_manager(ctx)?;
            let id = session.update(|l| Ok(l.add_location(Location::new(&name, &address))))?;
            report_created(ctx, "location.add", Icons::BUILDING, "Location", &name, &id)
        }
        LocationCommand::List => {
            let ledger = session.ledger();
            if !ctx.output_mode.is_human() {
                return emit(ctx, "location.list", &ledger.locations());
            }
            let mut table = TableBuilder::new(["Id", "Name", "Address", "Rooms", "Assets"]);
            for location in ledger.locations() {
                table.add_row([
                    location.id.clone(),
                    location.name.clone(),
                    location.address.clone(),
                    ledger.rooms_in_location(&location.id).len().to_string(),
                    ledger.assets_in_location(&location.id).len().to_string(),
                ]);
            }
            print_table(table);
            Ok(())
        }
        LocationCommand::Update { id, name, address } => {
            require_manager(ctx)?;
            session.update(|l| l.update_location(&id, LocationPatch { name, address }))?;
            report_done(ctx, "location.update", &format!("Location {} updated", id))
        }
        LocationCommand::Delete { id } => {
            require_manager(ctx)?;
            session.ledger().ensure_location_empty(&id)?;
            session.update(|l| l.delete_location(&id))?;
            report_done(ctx, "location.delete", &format!("Location {} deleted", id))
        }
    }
}

// ========== rooms ==========

fn run_room(session: &mut Session, ctx: &Context, action: RoomCommand) -> anyhow::Result<()> {
    match action {
        RoomCommand::Add { name, location, description } => {
            require_manager(ctx)?;
            let id = session.update(|l| l.add_room(Room::new(&location, &name, &description)))?;
            report_created(ctx, "room.add", Icons::ROOM, "Room", &name, &id)
        }
        RoomCommand::List { location } => {
            let ledger = session.ledger();
            let rooms: Vec<&Room> = match &location {
                Some(location_id) => ledger.rooms_in_location(location_id),
                None => ledger.rooms().iter().collect(),
            };
            if !ctx.output_mode.is_human() {
                return emit(ctx, "room.list", &rooms);
            }
            let mut table = TableBuilder::new(["Id", "Name", "Location", "Assets", "Last status"]);
            for room in rooms {
                let location_name = ledger
                    .location(&room.location_id)
                    .map(|l| l.name.clone())
                    .unwrap_or_else(|| ui::muted("(missing)"));
                let last_status = ledger
                    .latest_checklist_for_room(&room.id)
                    .map(|c| c.room_status.to_string())
                    .unwrap_or_else(|| "-".to_string());
                table.add_row([
                    room.id.clone(),
                    room.name.clone(),
                    location_name,
                    ledger.assets_in_room(&room.id).len().to_string(),
                    last_status,
                ]);
            }
            print_table(table);
            Ok(())
        }
        RoomCommand::Update { id, name, description, location } => {
            require_manager(ctx)?;
            let patch = RoomPatch {
                location_id: location,
                name,
                description,
            };
            session.update(|l| l.update_room(&id, patch))?;
            report_done(ctx, "room.update", &format!("Room {} updated", id))
        }
        RoomCommand::Delete { id } => {
            require_manager(ctx)?;
            let released = session.update(|l| l.delete_room(&id))?;
            if ctx.output_mode.is_human() {
                success(&format!("Room {} deleted", id));
                if released > 0 {
                    summary_row("Returned to warehouse:", &released.to_string());
                }
                Ok(())
            } else {
                emit(ctx, "room.delete", &serde_json::json!({ "id": id, "released": released }))
            }
        }
    }
}

// ========== assets ==========

fn parse_date(value: Option<String>) -> anyhow::Result<Option<NaiveDate>> {
    value
        .map(|v| NaiveDate::parse_from_str(&v, "%Y-%m-%d"))
        .transpose()
        .map_err(|e| anyhow::anyhow!("invalid date (expected YYYY-MM-DD): {}", e))
}

fn run_asset(session: &mut Session, ctx: &Context, action: AssetCommand) -> anyhow::Result<()> {
    match action {
        AssetCommand::Add {
            name,
            location,
            category,
            quantity,
            status,
            position,
            description,
            notes,
            entry_date,
        } => {
            require_manager(ctx)?;
            let draft = AssetDraft {
                location_id: location,
                name,
                category,
                status: status.parse()?,
                condition_notes: notes,
                description,
                position,
                entry_date: parse_date(entry_date)?,
            };
            let operator = ctx.operator.clone();
            let ids = session.update(|l| l.register_assets(&draft, quantity, Some(&operator)))?;

            if !ctx.output_mode.is_human() {
                let created: Vec<_> = ids.iter().filter_map(|id| session.ledger().asset(id)).collect();
                return emit(ctx, "asset.add", &created);
            }
            success(&format!("Registered {} unit(s)", ids.len()));
            let mut table = TableBuilder::new(["Id", "Code", "Name"]);
            for asset in ids.iter().filter_map(|id| session.ledger().asset(id)) {
                table.add_row([asset.id.clone(), asset.asset_code.clone(), asset.name.clone()]);
            }
            print_table(table);
            Ok(())
        }
        AssetCommand::List { location, room, category, unassigned } => {
            let ledger = session.ledger();
            let mut assets = match &room {
                Some(room_id) => ledger.assets_in_room(room_id),
                None if unassigned => ledger.unassigned_assets(),
                None => ledger.assets().iter().collect(),
            };
            if let Some(location_id) = &location {
                assets.retain(|a| &a.location_id == location_id);
            }
            if let Some(category) = &category {
                assets.retain(|a| a.category.eq_ignore_ascii_case(category));
            }
            assets.sort_by(|a, b| a.asset_code.cmp(&b.asset_code));

            if !ctx.output_mode.is_human() {
                return emit(ctx, "asset.list", &assets);
            }
            let mut table = TableBuilder::new(["Id", "Code", "Name", "Category", "Status", "Room", "Position"]);
            for asset in assets {
                let room_name = ledger
                    .room_of_asset(&asset.id)
                    .map(|r| r.name.clone())
                    .unwrap_or_else(|| ui::muted("Gudang"));
                table.add_row([
                    asset.id.clone(),
                    asset.asset_code.clone(),
                    asset.name.clone(),
                    asset.category.clone(),
                    status_label(asset.status),
                    room_name,
                    asset.position.clone(),
                ]);
            }
            print_table(table);
            Ok(())
        }
        AssetCommand::Show { id } => {
            let ledger = session.ledger();
            let asset = ledger.require_asset(&id)?;
            let logs = ledger.logs_for_asset(&id);

            if !ctx.output_mode.is_human() {
                return emit(ctx, "asset.show", &serde_json::json!({
                    "asset": asset,
                    "room": ledger.room_of_asset(&id),
                    "logs": logs,
                }));
            }
            section(&format!("{} {} [{}]", Icons::PACKAGE, asset.name, asset.asset_code));
            let location = ledger.location(&asset.location_id).map(|l| l.name.as_str()).unwrap_or("-");
            let room = ledger.room_of_asset(&id).map(|r| r.name.as_str()).unwrap_or("Gudang");
            summary_row("Category:", &asset.category);
            summary_row("Status:", &status_label(asset.status));
            summary_row("Location:", location);
            summary_row("Room:", room);
            summary_row("Position:", &asset.position);
            summary_row("Condition:", &asset.condition_notes);
            summary_row("Description:", &asset.description);
            summary_row(
                "Entry date:",
                &asset.entry_date.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string()),
            );
            summary_row("Modified by:", &format!("{} at {}", asset.last_modified_by, asset.updated_at.format("%Y-%m-%d %H:%M")));

            section(&format!("{} History", Icons::LOG));
            print_table(log_table(&logs));
            Ok(())
        }
        AssetCommand::Update {
            id,
            name,
            category,
            status,
            position,
            description,
            notes,
        } => {
            require_manager(ctx)?;
            let patch = AssetPatch {
                name,
                category,
                status: status.map(|s| s.parse::<AssetStatus>()).transpose()?,
                position,
                description,
                condition_notes: notes,
                last_modified_by: Some(ctx.operator.name.clone()),
                ..Default::default()
            };
            session.update(|l| l.update_asset(&id, patch))?;
            report_done(ctx, "asset.update", &format!("Asset {} updated", id))
        }
        AssetCommand::Delete { id } => {
            require_manager(ctx)?;
            session.update(|l| l.delete_asset(&id))?;
            report_done(ctx, "asset.delete", &format!("Asset {} deleted", id))
        }
    }
}

// ========== assignments ==========

fn run_assign(session: &mut Session, ctx: &Context, asset: String, room: String) -> anyhow::Result<()> {
    require_manager(ctx)?;
    let operator = ctx.operator.clone();
    let id = session.update(|l| l.add_room_asset(RoomAsset::new(&room, &asset, ""), Some(&operator)))?;

    let room_name = session.ledger().room(&room).map(|r| r.name.clone()).unwrap_or_default();
    if ctx.output_mode.is_human() {
        success(&format!("{} Asset {} is now in {}", Icons::MOVE, asset, room_name));
        summary_row("Assignment:", &id);
        Ok(())
    } else {
        emit(ctx, "assign", &session.ledger().assignment_of(&asset))
    }
}

fn run_move(session: &mut Session, ctx: &Context, asset: String, to: String) -> anyhow::Result<()> {
    let destination = if to.eq_ignore_ascii_case("warehouse") || to.eq_ignore_ascii_case("gudang") {
        WAREHOUSE_ROOM_ID.to_string()
    } else {
        to
    };
    let operator = ctx.operator.clone();
    session.update(|l| l.move_room_asset(&asset, &destination, Some(&operator)))?;

    let ledger = session.ledger();
    if !ctx.output_mode.is_human() {
        return emit(ctx, "move", &serde_json::json!({
            "assetId": asset,
            "room": ledger.room_of_asset(&asset),
        }));
    }
    match ledger.room_of_asset(&asset) {
        Some(room) => success(&format!("{} Asset {} moved to {}", Icons::MOVE, asset, room.name)),
        None => success(&format!("{} Asset {} is in the warehouse", Icons::WAREHOUSE, asset)),
    }
    Ok(())
}

fn run_unassign(session: &mut Session, ctx: &Context, id: String) -> anyhow::Result<()> {
    require_manager(ctx)?;
    let operator = ctx.operator.clone();
    session.update(|l| l.delete_room_asset(&id, Some(&operator)))?;
    report_done(ctx, "unassign", &format!("{} Assignment {} removed; asset returned to warehouse", Icons::WAREHOUSE, id))
}

// ========== checklists ==========

fn run_checklist(session: &mut Session, ctx: &Context, action: ChecklistCommand) -> anyhow::Result<()> {
    match action {
        ChecklistCommand::Submit { file } => {
            let contents = std::fs::read_to_string(&file)?;
            let draft: ChecklistDraft = serde_json::from_str(&contents)?;
            let checklist = session.ledger().prepare_checklist(draft, &ctx.operator)?;
            let updates = session.ledger().derive_asset_updates(&checklist);
            let update_count = updates.len();
            let item_count = checklist.items.len();

            let id = session.update(|l| l.apply_checklist(checklist, updates))?;
            tracing::info!("Checklist {} applied ({} items, {} asset updates)", id, item_count, update_count);

            if ctx.output_mode.is_human() {
                success(&format!("{} Checklist {} submitted", Icons::CLIPBOARD, id));
                summary_row("Items:", &item_count.to_string());
                summary_row("Assets updated:", &update_count.to_string());
                Ok(())
            } else {
                emit(ctx, "checklist.submit", &session.ledger().checklist(&id))
            }
        }
        ChecklistCommand::List { unread } => {
            let ledger = session.ledger();
            let checklists = if unread {
                ledger.unread_checklists()
            } else {
                let mut all: Vec<_> = ledger.checklists().iter().collect();
                all.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
                all
            };
            if !ctx.output_mode.is_human() {
                return emit(ctx, "checklist.list", &checklists);
            }
            let mut table = TableBuilder::new(["", "Id", "When", "Location", "Room", "Operator", "Room status", "Items"]);
            for checklist in checklists {
                let marker = if checklist.is_read { Icons::READ } else { Icons::UNREAD };
                table.add_row([
                    marker.to_string(),
                    checklist.id.clone(),
                    checklist.timestamp.format("%Y-%m-%d %H:%M").to_string(),
                    checklist.location_name.clone(),
                    checklist.room_name.clone(),
                    checklist.operator_name.clone(),
                    checklist.room_status.to_string(),
                    checklist.items.len().to_string(),
                ]);
            }
            print_table(table);
            Ok(())
        }
        ChecklistCommand::Read { id } => {
            if ctx.operator.role.can_manage() {
                session.update(|l| l.mark_checklist_as_read(&id))?;
            }
            let checklist = session.ledger().require_checklist(&id)?;

            if !ctx.output_mode.is_human() {
                return emit(ctx, "checklist.read", checklist);
            }
            section(&format!("{} {} / {}", Icons::CLIPBOARD, checklist.location_name, checklist.room_name));
            summary_row("Operator:", &format!("{} ({})", checklist.operator_name, checklist.operator_role));
            summary_row("When:", &checklist.timestamp.format("%Y-%m-%d %H:%M").to_string());
            summary_row(
                "Room status:",
                &checklist
                    .room_status
                    .to_string()
                    .style(ui::theme().room_status(checklist.room_status))
                    .to_string(),
            );
            summary_row("Notes:", &checklist.overall_notes);

            let mut table = TableBuilder::new(["Asset", "Status", "Notes", "Moved to"]);
            for item in &checklist.items {
                let moved = match item.moved_to_room_id.as_deref() {
                    Some(WAREHOUSE_ROOM_ID) => "Gudang".to_string(),
                    Some(room_id) => session
                        .ledger()
                        .room(room_id)
                        .map(|r| r.name.clone())
                        .unwrap_or_else(|| room_id.to_string()),
                    None => String::new(),
                };
                table.add_row([item.asset_name.clone(), status_label(item.status), item.notes.clone(), moved]);
            }
            print_table(table);
            Ok(())
        }
    }
}

// ========== categories ==========

fn run_category(session: &mut Session, ctx: &Context, action: CategoryCommand) -> anyhow::Result<()> {
    match action {
        CategoryCommand::Add { name } => {
            require_manager(ctx)?;
            let added = session.update(|l| Ok(l.add_category(&name)))?;
            if !added {
                ui::warn(&format!("Category '{}' already exists or is blank", name.trim()));
            }
            report_done(ctx, "category.add", &format!("{} Category '{}' available", Icons::TAG, name.trim()))
        }
        CategoryCommand::List => {
            let categories = session.ledger().categories();
            if !ctx.output_mode.is_human() {
                return emit(ctx, "category.list", &categories);
            }
            for category in categories {
                let count = session.ledger().assets().iter().filter(|a| &a.category == category).count();
                println!("{} {} {}", Icons::TAG, category, ui::dim(&format!("({})", count)));
            }
            Ok(())
        }
        CategoryCommand::Delete { name } => {
            require_manager(ctx)?;
            if !session.update(|l| Ok(l.delete_category(&name)))? {
                anyhow::bail!("no category named '{}'", name);
            }
            report_done(ctx, "category.delete", &format!("Category '{}' deleted", name))
        }
    }
}

// ========== audit trail ==========

fn log_table(logs: &[&AssetLog]) -> TableBuilder {
    let mut table = TableBuilder::new(["When", "Type", "Asset", "From", "To", "By", "Notes"]);
    for log in logs {
        table.add_row([
            log.timestamp.format("%Y-%m-%d %H:%M").to_string(),
            log.kind.to_string(),
            log.asset_id.clone(),
            log.from_value.clone().unwrap_or_default(),
            log.to_value.clone().unwrap_or_default(),
            format!("{} ({})", log.operator_name, log.operator_role),
            log.notes.clone().unwrap_or_default(),
        ]);
    }
    table
}

fn run_logs(
    session: &Session,
    ctx: &Context,
    asset: Option<String>,
    kind: Option<String>,
    limit: usize,
) -> anyhow::Result<()> {
    let ledger = session.ledger();
    let kind: Option<LogKind> = kind.map(|k| k.parse()).transpose()?;

    let logs = match &asset {
        Some(asset_id) => {
            let mut logs = ledger.logs_for_asset(asset_id);
            logs.retain(|l| kind.is_none_or(|k| l.kind == k));
            logs.truncate(limit);
            logs
        }
        None => ledger.recent_logs(kind, limit),
    };

    if !ctx.output_mode.is_human() {
        return emit(ctx, "logs", &logs);
    }
    print_table(log_table(&logs));
    Ok(())
}

fn run_auth(session: &mut Session, ctx: &Context, event: AuthEvent) -> anyhow::Result<()> {
    let operator = ctx.operator.clone();
    let id = session.update(|l| Ok(l.record_auth(&operator, event)))?;
    tracing::debug!("Auth entry {}", id);
    report_done(
        ctx,
        "auth",
        &format!("{} {} recorded for {} ({})", Icons::PERSON, event.as_str(), operator.name, operator.role),
    )
}

// ========== stats ==========

fn run_stats(session: &Session, ctx: &Context) -> anyhow::Result<()> {
    let stats = session.ledger().stats();
    session.flush();
    let storage = SqliteStore::open(&ctx.database)?.stats()?;

    if !ctx.output_mode.is_human() {
        return emit(ctx, "stats", &serde_json::json!({ "ledger": stats, "storage": storage }));
    }

    if !is_quiet() {
        println!("{} Studioledger Statistics ({:?})", Icons::STATS, ctx.database);
    }
    let mut rows = vec![
        ("Locations", stats.locations.to_string()),
        ("Rooms", stats.rooms.to_string()),
        ("Assets", stats.assets.to_string()),
        ("  assigned", stats.assigned.to_string()),
        ("  in warehouse", stats.in_warehouse.to_string()),
        ("Checklists", stats.checklists.to_string()),
        ("  unread", stats.unread_checklists.to_string()),
        ("Audit entries", stats.logs.to_string()),
        ("Categories", stats.categories.to_string()),
        ("Stored bytes", storage.bytes.to_string()),
    ];
    for (status, count) in &stats.by_status {
        rows.push((status_name(*status), count.to_string()));
    }
    println!("{}", stats_table(&rows));
    Ok(())
}

fn status_name(status: AssetStatus) -> &'static str {
    match status {
        AssetStatus::Baik => "  BAIK",
        AssetStatus::Rusak => "  RUSAK",
        AssetStatus::Mati => "  MATI",
        AssetStatus::Servis => "  SERVIS",
        AssetStatus::Jual => "  JUAL",
        AssetStatus::Hilang => "  HILANG",
        AssetStatus::Unset => "  (no status)",
    }
}

// ========== shared reporting ==========

fn report_created(ctx: &Context, command: &str, icon: &str, what: &str, name: &str, id: &str) -> anyhow::Result<()> {
    if ctx.output_mode.is_human() {
        success(&format!("{} {} '{}' created", icon, what, name));
        summary_row("Id:", id);
        Ok(())
    } else {
        emit(ctx, command, &serde_json::json!({ "id": id, "name": name }))
    }
}

fn report_done(ctx: &Context, command: &str, message: &str) -> anyhow::Result<()> {
    match ctx.output_mode {
        OutputMode::Human => {
            success(message);
            Ok(())
        }
        OutputMode::Json => emit(ctx, command, &serde_json::json!({ "message": message })),
    }
}
