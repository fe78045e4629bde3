use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use idexml_resolver::{read_doctype_from_path, DtdResolver, ResolvedEntity};
use idexml_settings::{write_atomic_with, Preferences, PreferencesStore};
use idexml_writer::{
    DebuggerProperties, DebuggerPropertiesWriter, DocumentKind, ExportConfig,
    HighlightingStylesWriter, LexerStyles, ProjectInfo, Shortcut, ShortcutsWriter,
    TemplateGroupDefinition, TemplatesWriter, UserProjectOverrides, UserProjectWriter, WriteXml,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{info, Level};

#[derive(Parser)]
#[command(
    name = "idexml",
    about = "Export IDE settings as versioned XML and resolve their DTDs",
    author,
    version
)]
struct Cli {
    /// 偏好設定檔路徑；預設為 ./.idexml/preferences.json。 / Preferences file (defaults to ./.idexml/preferences.json).
    #[arg(long, global = true, value_name = "PATH")]
    preferences: Option<PathBuf>,
    /// 於 stderr 輸出除錯訊息。 / Print debug logging to stderr.
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 將設定匯出為 XML。 / Export settings to a versioned XML document.
    #[command(subcommand)]
    Export(ExportCommand),
    /// 解析 DTD 系統識別碼。 / Resolve a DTD system identifier.
    Resolve(ResolveArgs),
    /// 顯示文件的 DOCTYPE 與對應 DTD。 / Show a document's DOCTYPE and the DTD it resolves to.
    Doctype(DoctypeArgs),
    /// 檢視或修改偏好設定。 / Show or change preferences.
    #[command(subcommand)]
    Preferences(PreferencesCommand),
}

#[derive(Subcommand)]
enum ExportCommand {
    /// 匯出語法高亮樣式。 / Export highlighting styles from a JSON lexer dump.
    Highlighting(ExportArgs),
    /// 匯出範本群組。 / Export template groups.
    Templates(ExportArgs),
    /// 匯出使用者專案覆寫設定。 / Export per-user project overrides.
    UserProject(ExportArgs),
    /// 匯出專案除錯器設定。 / Export project debugger properties.
    Debugger(ExportArgs),
    /// 匯出鍵盤快速鍵。 / Export keyboard shortcuts.
    Shortcuts(ExportArgs),
}

#[derive(Args)]
struct ExportArgs {
    /// JSON 模型檔案。 / JSON model to export.
    #[arg(long, value_name = "FILE")]
    input: PathBuf,
    /// 輸出 XML 檔案。 / Destination XML file.
    #[arg(long, value_name = "FILE")]
    output: PathBuf,
}

#[derive(Args)]
struct ResolveArgs {
    /// DOCTYPE 中的系統識別碼。 / System identifier from a DOCTYPE.
    #[arg(value_name = "SYSTEM_ID")]
    system_id: String,
    /// 公開識別碼（僅供記錄）。 / Public identifier (informational).
    #[arg(long, value_name = "ID")]
    public_id: Option<String>,
    /// 覆寫偏好設定中的 DTD 目錄。 / Override the DTD directory from preferences.
    #[arg(long, value_name = "DIR")]
    dtd_dir: Option<PathBuf>,
}

#[derive(Args)]
struct DoctypeArgs {
    /// 要檢查的 XML 文件。 / XML document to inspect.
    #[arg(value_name = "FILE")]
    file: PathBuf,
    /// 覆寫偏好設定中的 DTD 目錄。 / Override the DTD directory from preferences.
    #[arg(long, value_name = "DIR")]
    dtd_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum PreferencesCommand {
    /// 以 JSON 顯示目前偏好設定。 / Print the current preferences as JSON.
    Show,
    /// 設定作者電子郵件。 / Set the author e-mail used in generation comments.
    SetEmail {
        #[arg(value_name = "EMAIL")]
        email: String,
    },
    /// 設定 DTD 目錄。 / Set the DTD directory.
    SetDtdDir {
        #[arg(value_name = "DIR")]
        dir: PathBuf,
    },
    /// 開關專案文件的時間戳記註解。 / Toggle Saved/Copyright comments in project documents.
    SetTimestamp {
        #[arg(value_name = "true|false", action = ArgAction::Set)]
        enabled: bool,
    },
}

#[derive(Deserialize)]
struct UserProjectInput {
    project: ProjectInfo,
    #[serde(default)]
    overrides: UserProjectOverrides,
}

#[derive(Deserialize)]
struct DebuggerInput {
    project: String,
    #[serde(default)]
    properties: DebuggerProperties,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let Cli {
        preferences,
        verbose,
        command,
    } = Cli::parse();
    init_tracing(verbose)?;

    let prefs_path = match preferences {
        Some(path) => resolve_input_path(&path)?,
        None => default_preferences_path()?,
    };

    match command {
        Commands::Export(subcommand) => {
            let prefs = load_preferences(&prefs_path)?;
            execute_export_command(subcommand, &prefs.export_config())
        }
        Commands::Resolve(args) => {
            let prefs = load_preferences(&prefs_path)?;
            execute_resolve(args, &prefs)
        }
        Commands::Doctype(args) => {
            let prefs = load_preferences(&prefs_path)?;
            execute_doctype(args, &prefs)
        }
        Commands::Preferences(subcommand) => execute_preferences_command(subcommand, &prefs_path),
    }
}

fn init_tracing(verbose: bool) -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(if verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!("failed to install logging: {err}"))
}

fn execute_export_command(command: ExportCommand, config: &ExportConfig) -> Result<()> {
    match command {
        ExportCommand::Highlighting(args) => {
            let lexers: Vec<LexerStyles> = load_json(&args.input)?;
            export_document(&args.output, DocumentKind::HighlightingStyles, |out| {
                HighlightingStylesWriter::new(out, &lexers, config).write_xml()
            })
        }
        ExportCommand::Templates(args) => {
            let groups: Vec<TemplateGroupDefinition> = load_json(&args.input)?;
            export_document(&args.output, DocumentKind::Templates, |out| {
                TemplatesWriter::new(out, &groups, config).write_xml()
            })
        }
        ExportCommand::UserProject(args) => {
            let input: UserProjectInput = load_json(&args.input)?;
            export_document(&args.output, DocumentKind::UserProject, |out| {
                UserProjectWriter::new(out, &input.project, &input.overrides, config).write_xml()
            })
        }
        ExportCommand::Debugger(args) => {
            let input: DebuggerInput = load_json(&args.input)?;
            export_document(&args.output, DocumentKind::DebuggerProperties, |out| {
                DebuggerPropertiesWriter::new(out, &input.project, &input.properties, config)
                    .write_xml()
            })
        }
        ExportCommand::Shortcuts(args) => {
            let shortcuts: Vec<Shortcut> = load_json(&args.input)?;
            export_document(&args.output, DocumentKind::Shortcuts, |out| {
                ShortcutsWriter::new(out, &shortcuts, config).write_xml()
            })
        }
    }
}

fn export_document<F>(output: &Path, kind: DocumentKind, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<fs::File>) -> std::io::Result<()>,
{
    let output = resolve_input_path(output)?;
    write_atomic_with(&output, write)
        .with_context(|| format!("could not write {kind} to {}", output.display()))?;
    info!(%kind, path = %output.display(), "document exported");
    println!("Exported {kind} to {}", output.display());
    Ok(())
}

fn execute_resolve(args: ResolveArgs, prefs: &Preferences) -> Result<()> {
    let resolver = resolver_for(args.dtd_dir, prefs)?;
    match resolver.resolve(args.public_id.as_deref(), &args.system_id) {
        Some(entity) => {
            println!("{}", entity.into_system_id());
            Ok(())
        }
        None => bail!(
            "'{}' is unresolved (DTD directory {})",
            args.system_id,
            resolver.dtd_dir().display()
        ),
    }
}

fn execute_doctype(args: DoctypeArgs, prefs: &Preferences) -> Result<()> {
    let file = resolve_input_path(&args.file)?;
    let doctype = read_doctype_from_path(&file)
        .with_context(|| format!("failed to inspect {}", file.display()))?;
    let Some(doctype) = doctype else {
        println!("{}: no DOCTYPE, document is not validated", file.display());
        return Ok(());
    };

    let resolver = resolver_for(args.dtd_dir, prefs)?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "root: {}", doctype.root)?;
    if let Some(public_id) = &doctype.public_id {
        writeln!(stdout, "public: {public_id}")?;
    }
    match &doctype.system_id {
        Some(system_id) => writeln!(stdout, "system: {system_id}")?,
        None => writeln!(stdout, "system: (none)")?,
    }
    match resolver.resolve_doctype(&doctype) {
        Some(ResolvedEntity::Local(path)) => writeln!(stdout, "dtd: {}", path.display())?,
        Some(ResolvedEntity::Remote(uri)) => writeln!(stdout, "dtd: {uri} (remote)")?,
        None => writeln!(stdout, "dtd: unresolved")?,
    }
    Ok(())
}

fn execute_preferences_command(command: PreferencesCommand, prefs_path: &Path) -> Result<()> {
    let mut store = PreferencesStore::load(prefs_path)
        .with_context(|| format!("failed to load preferences from {}", prefs_path.display()))?;
    match command {
        PreferencesCommand::Show => {
            let payload = serde_json::to_string_pretty(store.preferences())
                .context("failed to serialize preferences")?;
            println!("{payload}");
            return Ok(());
        }
        PreferencesCommand::SetEmail { email } => {
            store.update(|prefs| prefs.user.email = email.clone())?;
        }
        PreferencesCommand::SetDtdDir { dir } => {
            let dir = resolve_input_path(&dir)?;
            store.update(|prefs| prefs.paths.dtd_dir = dir.clone())?;
        }
        PreferencesCommand::SetTimestamp { enabled } => {
            store.update(|prefs| prefs.project.xml_timestamp = enabled)?;
        }
    }
    println!("Updated preferences at {}", store.path().display());
    Ok(())
}

fn load_preferences(path: &Path) -> Result<Preferences> {
    let store = PreferencesStore::load(path)
        .with_context(|| format!("failed to load preferences from {}", path.display()))?;
    Ok(store.preferences().clone())
}

fn resolver_for(override_dir: Option<PathBuf>, prefs: &Preferences) -> Result<DtdResolver> {
    Ok(match override_dir {
        Some(dir) => DtdResolver::new(resolve_input_path(&dir)?),
        None => prefs.dtd_resolver(),
    })
}

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let path = resolve_input_path(path)?;
    if !path.exists() {
        bail!("input '{}' does not exist", path.display());
    }
    let contents =
        fs::read_to_string(&path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("failed to parse {}", path.display()))
}

fn default_preferences_path() -> Result<PathBuf> {
    Ok(std::env::current_dir()
        .context("determine current directory")?
        .join(".idexml")
        .join("preferences.json"))
}

fn resolve_input_path(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()
            .context("determine current directory")?
            .join(path))
    }
}
