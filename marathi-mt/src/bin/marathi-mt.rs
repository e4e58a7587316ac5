use clap::{Arg, Command};
use marathi_mt::{
    Dictionary, InferenceEndpointProvider, Language, MachineTranslator, MockMode, MockTranslator,
    OneOrMany, SourceLanguage, TranslationService, WhatlangEstimator, detect_languages,
};
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let matches = Command::new("marathi-mt")
        .version(env!("CARGO_PKG_VERSION"))
        .about("English <-> Marathi translation from the command line")
        .arg(
            Arg::new("text")
                .help("Text to translate")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("source")
                .long("source")
                .short('s')
                .help("Source language code: en, mr or auto (detect from the text)")
                .default_value("auto"),
        )
        .arg(
            Arg::new("target")
                .long("target")
                .short('t')
                .help("Target language code: en or mr")
                .default_value("mr"),
        )
        .arg(
            Arg::new("dictionary")
                .long("dictionary")
                .short('d')
                .help("Path to the phrase dictionary JSON")
                .default_value("data/dictionary.json"),
        )
        .arg(
            Arg::new("mock")
                .long("mock")
                .short('m')
                .help("Use the offline mock backend instead of the inference endpoint")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("detect")
                .long("detect")
                .help("Only detect the language of the text")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log each pipeline step")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    let text = matches.get_one::<String>("text").cloned().unwrap_or_default();
    let source = matches
        .get_one::<String>("source")
        .map(String::as_str)
        .unwrap_or("auto");
    let target = matches
        .get_one::<String>("target")
        .map(String::as_str)
        .unwrap_or("mr");
    let dictionary_path = matches
        .get_one::<String>("dictionary")
        .map(String::as_str)
        .unwrap_or("data/dictionary.json");

    let default_level = if matches.get_flag("verbose") { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    // Detection runs locally and needs no translation backend
    if matches.get_flag("detect") {
        for line in detection_lines(text) {
            println!("{}", line);
        }
        return Ok(());
    }

    let translator: Arc<dyn MachineTranslator> = if matches.get_flag("mock") {
        Arc::new(MockTranslator::new(MockMode::Suffix))
    } else {
        match InferenceEndpointProvider::from_env() {
            Ok(provider) => Arc::new(provider),
            Err(e) => {
                eprintln!("❌ {}", e);
                eprintln!("   Set it with: export MARATHI_MT_ENDPOINT=http://localhost:8080");
                eprintln!("   Or use --mock to use the mock translator");
                return Err(e.into());
            }
        }
    };

    let service = TranslationService::new(translator)
        .with_dictionary(Dictionary::load_or_empty(Path::new(dictionary_path)));

    let source: SourceLanguage = source.parse()?;
    let target: Language = target.parse()?;
    let result = service
        .translate(&OneOrMany::One(text), source, target)
        .await?;

    if let OneOrMany::One(translated) = result.translated_text {
        println!("{}", translated);
    }

    Ok(())
}

/// `--detect` output: one `code<TAB>confidence` line per language, best first
fn detection_lines(text: String) -> Vec<String> {
    detect_languages(&WhatlangEstimator::new(), &[text], &Language::codes())
        .into_iter()
        .map(|detected| format!("{}\t{:.1}", detected.language, detected.confidence))
        .collect()
}
