use clap::Parser;
use farm_sim::core::stock;
use farm_sim::utils::error::ErrorSeverity;
use farm_sim::utils::logger;
use farm_sim::{
    CliCommand, CliConfig, ConfigProvider, FarmEngine, FarmError, FarmStore, LocalStorage,
    MobId, PaddockId, SeedData, SnapshotStore, TomlConfig,
};

fn seed_state(settings: &TomlConfig) -> farm_sim::Result<farm_sim::FarmState> {
    SeedData::from_dir(settings.seed_dir())?.into_state(settings.start_date())
}

/// Starts from the seed files when present, otherwise from an empty farm.
fn initial_state(settings: &TomlConfig) -> farm_sim::Result<farm_sim::FarmState> {
    if settings.seed_dir().is_dir() {
        seed_state(settings)
    } else {
        tracing::warn!(
            "Seed directory {} not found, starting with an empty farm",
            settings.seed_dir().display()
        );
        Ok(farm_sim::FarmState::empty(settings.start_date()))
    }
}

async fn run<S: FarmStore>(engine: &FarmEngine<S, TomlConfig>, command: CliCommand) -> farm_sim::Result<()> {
    match command {
        CliCommand::Date => {
            println!("{}", engine.current_date().await);
        }
        CliCommand::Advance { days } => {
            for _ in 0..days {
                let report = engine.advance_day().await?;
                println!("Advanced to {}", report.new_date);
            }
        }
        CliCommand::Paddocks => {
            println!(
                "{:>4}  {:<16} {:>8} {:>10} {:>12}  {:<12} {:>6}",
                "id", "name", "area", "dm/ha", "total dm", "mob", "stock"
            );
            for p in engine.list_paddocks_with_occupancy().await {
                println!(
                    "{:>4}  {:<16} {:>8.2} {:>10.1} {:>12.1}  {:<12} {:>6}",
                    p.id,
                    p.name,
                    p.area,
                    p.dm_per_ha,
                    p.total_dm,
                    p.mob_name.unwrap_or_default(),
                    p.stock_count
                );
            }
        }
        CliCommand::Mobs => {
            for mob in engine.list_mobs_with_paddock().await {
                println!(
                    "{:>4}  {:<16} {}",
                    mob.id,
                    mob.name,
                    mob.paddock_name.unwrap_or_else(|| "-".to_string())
                );
            }
        }
        CliCommand::Stock { csv } => {
            let as_of = engine.current_date().await;
            let groups = engine.list_stock_grouped_by_mob(as_of).await?;
            if csv {
                print!("{}", stock::to_csv(&groups)?);
            } else {
                for group in groups {
                    let avg = group
                        .avg_weight
                        .map(|w| format!("{:.1} kg", w))
                        .unwrap_or_else(|| "-".to_string());
                    println!(
                        "{} ({}): {} head, avg {}",
                        group.mob.name,
                        group.mob.paddock_name.as_deref().unwrap_or("no paddock"),
                        group.count,
                        avg
                    );
                    for animal in group.animals {
                        println!(
                            "    {:>5}  born {}  age {:<12} {:>7.1} kg",
                            animal.id,
                            animal.dob,
                            animal.age.to_string(),
                            animal.weight
                        );
                    }
                }
            }
        }
        CliCommand::Available => {
            for p in engine.available_paddocks().await {
                println!("{:>4}  {}", p.id, p.name);
            }
        }
        CliCommand::AddPaddock { name, area, dm_per_ha } => {
            let id = engine.add_paddock(&name, area, dm_per_ha).await?;
            println!("Added paddock {} with id {}", name, id);
        }
        CliCommand::EditPaddock { id, name, area, dm_per_ha } => {
            match engine.edit_paddock(PaddockId(id), &name, area, dm_per_ha).await? {
                farm_sim::EditOutcome::Updated => println!("Paddock {} updated", id),
                farm_sim::EditOutcome::Unchanged => println!("Paddock {} unchanged", id),
            }
        }
        CliCommand::MoveMob { mob_id, paddock_id } => {
            engine.relocate_mob(MobId(mob_id), PaddockId(paddock_id)).await?;
            println!("Mob {} moved to paddock {}", mob_id, paddock_id);
        }
        CliCommand::Reset => {
            let state = seed_state(engine.config())?;
            engine.reset(state).await?;
            println!("Farm reset to {}", engine.current_date().await);
        }
    }
    Ok(())
}

fn exit_code(e: &FarmError) -> i32 {
    match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

fn fail(e: FarmError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(exit_code(&e));
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let settings = match cli.settings() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    let verbose = cli.verbose || settings.verbose();
    if cli.json_logs || settings.json_logs() {
        logger::init_json_logger(verbose);
    } else {
        logger::init_cli_logger(verbose);
    }
    tracing::debug!("Settings: {:?}", settings);

    let store = SnapshotStore::new(LocalStorage::new(settings.data_dir()));
    let engine = match FarmEngine::open_or_init(store, settings, initial_state).await {
        Ok(engine) => engine,
        Err(e) => fail(e),
    };

    if let Err(e) = run(&engine, cli.command).await {
        fail(e);
    }

    Ok(())
}
