use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use dialoguer::{Confirm, Input, Password, Select};
use dotenvy::dotenv;

use userdesk::cli::Workspace;
use userdesk::cli::seeder::{SeedConfig, seed_memory};
use userdesk::logging::init_tracing;
use userdesk::modules::assignments::model::AssignmentForm;
use userdesk::modules::permissions::creatable_roles;
use userdesk::modules::users::model::{Submission, UserRow};
use userdesk::utils::debounce::spawn_search_debounce;
use userdesk_api::MemoryApi;
use userdesk_auth::TokenStore;
use userdesk_models::{CreateUserDto, EditUserDto, Role, RoleFilter, UserId};

#[derive(Parser)]
#[command(name = "userdesk-cli")]
#[command(about = "Userdesk CLI - Offline user management console", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Seed the local snapshot with fake users, states and centers
    Seed {
        /// Name of the admin account to create
        #[arg(long, default_value = "admin")]
        admin: String,

        /// Password of the admin account (prompted if not provided)
        #[arg(long)]
        admin_password: Option<String>,

        /// Number of users per assignable role
        #[arg(short = 'u', long, default_value = "3")]
        per_role: usize,

        /// Number of states and of centers
        #[arg(short = 'p', long, default_value = "4")]
        places: usize,
    },
    /// Log in and persist a session token
    Login {
        #[arg(short = 'n', long)]
        name: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Forget the persisted session token
    Logout,
    /// List the users visible to the logged-in viewer
    List {
        #[arg(short = 's', long, default_value = "")]
        search: String,

        /// Role tag, or "all"
        #[arg(short = 'r', long, default_value = "all")]
        role: String,

        /// Print the rows as JSON
        #[arg(long)]
        json: bool,
    },
    /// Search the list interactively; an empty line quits
    Browse,
    /// Create a user
    Create {
        #[arg(short = 'n', long)]
        name: Option<String>,

        #[arg(short = 'f', long)]
        full_name: Option<String>,

        /// Role tag (selected from the creatable roles if not provided)
        #[arg(short = 'r', long)]
        role: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Edit a user's names or password
    Edit {
        id: UserId,

        #[arg(short = 'n', long)]
        name: Option<String>,

        #[arg(short = 'f', long)]
        full_name: Option<String>,

        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Delete an unassigned user
    Delete {
        id: UserId,

        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
    /// Run the assignment workflow a user offers
    Assign { id: UserId },
    /// Print which roles each role may create
    Permissions {
        #[arg(short = 'r', long)]
        role: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    if let Err(e) = run(cli.command).await {
        eprintln!("\n❌ {:#}", e);
        std::process::exit(1);
    }
}

async fn run(command: Commands) -> anyhow::Result<()> {
    let workspace = Workspace::from_env();

    match command {
        Commands::Seed {
            admin,
            admin_password,
            per_role,
            places,
        } => handle_seed(&workspace, admin, admin_password, per_role, places),
        Commands::Login { name, password } => handle_login(&workspace, name, password),
        Commands::Logout => {
            workspace.token_store().clear()?;
            println!("👋 Logged out");
            Ok(())
        }
        Commands::List { search, role, json } => {
            handle_list(&workspace, search, role, json).await
        }
        Commands::Browse => handle_browse(&workspace).await,
        Commands::Create {
            name,
            full_name,
            role,
            password,
        } => handle_create(&workspace, name, full_name, role, password).await,
        Commands::Edit {
            id,
            name,
            full_name,
            password,
        } => {
            let dto = EditUserDto {
                name,
                full_name,
                password,
            };
            handle_edit(&workspace, id, dto).await
        }
        Commands::Delete { id, yes } => handle_delete(&workspace, id, yes).await,
        Commands::Assign { id } => handle_assign(&workspace, id).await,
        Commands::Permissions { role } => handle_permissions(role),
    }
}

fn prompt_text(prompt: &str, value: Option<String>) -> anyhow::Result<String> {
    match value {
        Some(value) => Ok(value),
        None => Input::<String>::new()
            .with_prompt(prompt)
            .interact_text()
            .with_context(|| format!("Failed to read {}", prompt.to_lowercase())),
    }
}

fn prompt_password(value: Option<String>, confirm: bool) -> anyhow::Result<String> {
    if let Some(value) = value {
        return Ok(value);
    }
    let mut prompt = Password::new().with_prompt("Password");
    if confirm {
        prompt = prompt.with_confirmation("Confirm password", "Passwords don't match");
    }
    prompt.interact().context("Failed to read password")
}

fn handle_seed(
    workspace: &Workspace,
    admin: String,
    admin_password: Option<String>,
    per_role: usize,
    places: usize,
) -> anyhow::Result<()> {
    let admin_password = prompt_password(admin_password, true)?;
    let config = SeedConfig {
        admin_name: admin.clone(),
        admin_password,
        managers: per_role,
        academics: per_role,
        financials: per_role,
        teachers: per_role * 2,
        state_users: per_role,
        center_users: per_role,
        states: places,
        centers: places,
        ..SeedConfig::default()
    };

    println!("🌱 Seeding {}...", workspace.console.data_file.display());
    let api = workspace.open_api()?;
    let summary = seed_memory(&api, &config)?;
    workspace.save_api(&api)?;

    println!("\n✅ Seeding complete!");
    println!("   Users: {}", summary.users);
    println!("   States: {}", summary.states);
    println!("   Centers: {}", summary.centers);
    println!("   Admin login: {}", admin);
    println!("   Other users share the password: {}", config.password);
    Ok(())
}

fn handle_login(
    workspace: &Workspace,
    name: Option<String>,
    password: Option<String>,
) -> anyhow::Result<()> {
    let name = prompt_text("Name", name)?;
    let password = prompt_password(password, false)?;
    let api = workspace.open_api()?;
    let session = workspace.login(&api, &name, &password)?;

    println!("\n✅ Logged in as {} ({})", session.name(), session.role().label());
    Ok(())
}

fn print_rows(rows: &[UserRow]) {
    if rows.is_empty() {
        println!("No users to show");
        return;
    }
    println!(
        "{:<36}  {:<24}  {:<20}  {:<10}  ACTIONS",
        "ID", "NAME", "ROLE", "STATUS"
    );
    for row in rows {
        let mut actions = Vec::new();
        if let Some(workflow) = row.actions.assign {
            actions.push(format!("assign ({})", workflow));
        }
        if row.actions.delete {
            actions.push("delete".to_string());
        }
        if row.actions.edit {
            actions.push("edit".to_string());
        }
        println!(
            "{:<36}  {:<24}  {:<20}  {:<10}  {}",
            row.user.id.to_string(),
            row.user.display_name(),
            row.user.role.label(),
            if row.user.status { "assigned" } else { "pending" },
            actions.join(", ")
        );
    }
}

async fn handle_list(
    workspace: &Workspace,
    search: String,
    role: String,
    json: bool,
) -> anyhow::Result<()> {
    let page = workspace.open_page(workspace.open_api()?).await?;
    page.set_search(search).await;
    page.set_role_filter(RoleFilter::parse(&role)).await;
    let rows = page.rows().await;
    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        print_rows(&rows);
    }
    Ok(())
}

async fn handle_browse(workspace: &Workspace) -> anyhow::Result<()> {
    let page = Arc::new(workspace.open_page(workspace.open_api()?).await?);
    let delay = workspace.console.search_debounce;
    let (input, applied) = spawn_search_debounce(delay);
    let follower = {
        let page = page.clone();
        tokio::spawn(async move { page.follow_search(applied).await })
    };

    loop {
        let term: String = Input::new()
            .with_prompt("Search")
            .allow_empty(true)
            .interact_text()
            .context("Failed to read search term")?;
        if term.trim().is_empty() {
            break;
        }
        input.send(term)?;
        tokio::time::sleep(delay + Duration::from_millis(50)).await;
        print_rows(&page.rows().await);
    }

    drop(input);
    follower.await?;
    Ok(())
}

async fn handle_create(
    workspace: &Workspace,
    name: Option<String>,
    full_name: Option<String>,
    role: Option<String>,
    password: Option<String>,
) -> anyhow::Result<()> {
    let api = workspace.open_api()?;
    let page = workspace.open_page(api.clone()).await?;

    let role = match role {
        Some(tag) => tag.parse::<Role>()?,
        None => {
            let roles = page.creatable_roles();
            if roles.is_empty() {
                bail!("A {} cannot create users", page.viewer().label());
            }
            let labels: Vec<&str> = roles.iter().map(|r| r.label()).collect();
            let index = Select::new()
                .with_prompt("Role")
                .items(&labels)
                .default(0)
                .interact()
                .context("Failed to read role")?;
            roles[index]
        }
    };
    let dto = CreateUserDto {
        name: prompt_text("Name", name)?,
        full_name: prompt_text("Full name", full_name)?,
        password: prompt_password(password, true)?,
        role,
    };

    if let Submission::Completed(user) = page.create_user(dto).await? {
        save(workspace, &api)?;
        println!("\n✅ User created successfully!");
        println!("   ID: {}", user.id);
        println!("   Name: {}", user.display_name());
        println!("   Role: {}", user.role.label());
    }
    Ok(())
}

async fn handle_edit(workspace: &Workspace, id: UserId, dto: EditUserDto) -> anyhow::Result<()> {
    let api = workspace.open_api()?;
    let page = workspace.open_page(api.clone()).await?;

    if let Submission::Completed(user) = page.edit_user(id, dto).await? {
        save(workspace, &api)?;
        println!("\n✅ User {} updated", user.display_name());
    }
    Ok(())
}

async fn handle_delete(workspace: &Workspace, id: UserId, yes: bool) -> anyhow::Result<()> {
    let api = workspace.open_api()?;
    let page = workspace.open_page(api.clone()).await?;

    let pending = page.request_delete(id).await?;
    let confirmed = yes
        || Confirm::new()
            .with_prompt(format!("Delete {}?", pending.name))
            .default(false)
            .interact()
            .context("Failed to read confirmation")?;
    if !confirmed {
        page.cancel_delete().await;
        println!("Cancelled");
        return Ok(());
    }

    if let Submission::Completed(_) = page.confirm_delete().await? {
        save(workspace, &api)?;
        println!("\n✅ Deleted {}", pending.name);
    }
    Ok(())
}

fn choose(form: &mut AssignmentForm) -> anyhow::Result<()> {
    let empty = form.empty_options();
    if !empty.is_empty() {
        let reasons: Vec<String> = empty.iter().map(ToString::to_string).collect();
        bail!("{}", reasons.join("; "));
    }
    let slots: Vec<_> = form.fields.iter().map(|f| f.slot).collect();
    for slot in slots {
        let options = form.options(slot).to_vec();
        let labels: Vec<&str> = options.iter().map(|o| o.name.as_str()).collect();
        let index = Select::new()
            .with_prompt(format!("Select a {}", slot.label()))
            .items(&labels)
            .default(0)
            .interact()
            .with_context(|| format!("Failed to read {}", slot.label()))?;
        form.select(slot, options[index].id);
    }
    Ok(())
}

async fn handle_assign(workspace: &Workspace, id: UserId) -> anyhow::Result<()> {
    let api = workspace.open_api()?;
    let page = workspace.open_page(api.clone()).await?;

    let mut form = page.open_assignment(id).await?;
    println!("{} for {}", form.workflow, form.target_name);
    choose(&mut form)?;
    let confirmed = Confirm::new()
        .with_prompt("Confirm assignment?")
        .default(true)
        .interact()
        .context("Failed to read confirmation")?;
    if !confirmed {
        println!("Cancelled");
        return Ok(());
    }

    if let Submission::Completed(user) = page.submit_assignment(&form).await? {
        save(workspace, &api)?;
        println!("\n✅ {} is now assigned", user.display_name());
    }
    Ok(())
}

fn handle_permissions(role: Option<String>) -> anyhow::Result<()> {
    let roles = match role {
        Some(tag) => vec![tag.parse::<Role>()?],
        None => Role::ALL.to_vec(),
    };
    for role in roles {
        let creatable: Vec<&str> = creatable_roles(role).iter().map(|r| r.as_str()).collect();
        println!(
            "{:<10} -> {}",
            role.as_str(),
            if creatable.is_empty() {
                "(none)".to_string()
            } else {
                creatable.join(", ")
            }
        );
    }
    Ok(())
}

fn save(workspace: &Workspace, api: &Arc<MemoryApi>) -> anyhow::Result<()> {
    workspace
        .save_api(api)
        .context("Failed to persist the local snapshot")
}
