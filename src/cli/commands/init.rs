//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file for one of the supported drivers.

use crate::domain::Driver;
use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "dbnorm.toml")]
    pub output: String,

    /// Driver of the sample connection
    #[arg(long, default_value = "pgsql", value_parser = ["pgsql", "mysql", "sqlite"])]
    pub driver: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, driver = %self.driver, "Initializing configuration file");

        println!("📝 Initializing dbnorm configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2); // Configuration error exit code
        }

        let driver: Driver = self.driver.parse()?;
        let config_content = generate_config(driver);

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your connection settings", self.output);
                if driver != Driver::Sqlite {
                    println!("  2. Set DBNORM_DB_PASSWORD in your environment or a .env file");
                }
                println!("  3. Validate configuration: dbnorm validate-config");
                println!("  4. Check connectivity: dbnorm test-connection");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(5) // Fatal error exit code
            }
        }
    }
}

/// Sample configuration using the multi-connection layout
pub fn generate_config(driver: Driver) -> String {
    let connection = match driver {
        Driver::Postgres => {
            r#"driver = "pgsql"
host = "localhost"
port = 5432
database = "app"
username = "app"
password = "${DBNORM_DB_PASSWORD}"
charset = "utf8"

[database.connections.main.options]
max_connections = 10
connect_timeout = 30"#
        }
        Driver::MySql => {
            r#"driver = "mysql"
host = "localhost"
port = 3306
database = "app"
username = "app"
password = "${DBNORM_DB_PASSWORD}"
charset = "utf8mb4"

[database.connections.main.options]
max_connections = 10
connect_timeout = 30"#
        }
        Driver::Sqlite => {
            r#"driver = "sqlite"
database = "storage/database.sqlite"

[database.connections.main.options]
create_if_missing = true"#
        }
    };

    format!(
        r#"# dbnorm Configuration File
# Supported drivers: pgsql, mysql, sqlite

[database]
default = "default"

[database.databases.default]
connection = "main"

[database.connections.main]
{connection}

# The [orm] block is written with defaults on first run when absent.
# [orm.schema]

[logging]
level = "info"
local_enabled = false
local_path = "storage/logs"
local_rotation = "daily"
"#
    )
}
