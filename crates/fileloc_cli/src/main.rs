/* 📖 # Why is the CLI minimal and hardcoded?

There is no argument parser and no option besides two positional arguments.
The binary always reads `fileloc.toml` from the current directory, so trying
out a location is just a matter of writing that file and running `fileloc`.

```text
fileloc [EXTENSIONS [PREFIX]]

fileloc             # every file of the location
fileloc txt,md      # only .txt and .md files
fileloc "" other_   # files whose name starts with "other_"
```

Exit codes:
- 0: files listed (possibly none)
- 1: error (config missing or invalid, bad filter, listing failed)
*/

use std::env;
use std::process;

use tracing::debug;

use fileloc_base::tracing::init_tracing;
use fileloc_base::{FilePath, FilelocResult, PalHandle, RealPal};
use fileloc_core::{ExtensionFilter, FileHandle, FileLocation, load_location_config};

fn main() {
    if let Err(e) = init_tracing() {
        eprintln!("Error: Failed to initialize tracing: {}", e);
        process::exit(1);
    }

    let current_dir = env::current_dir().unwrap_or_else(|e| {
        eprintln!("Error: Failed to get current directory: {}", e);
        process::exit(1);
    });

    let pal = PalHandle::new(RealPal::new(current_dir));
    let config_path = FilePath::from("fileloc.toml");
    let config = match load_location_config(&pal, &config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: Failed to load config from fileloc.toml: {}", e);
            process::exit(1);
        }
    };

    let mut args = env::args().skip(1);
    let filter = match args.next().unwrap_or_default().parse::<ExtensionFilter>() {
        Ok(filter) => filter,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };
    let prefix = args.next().unwrap_or_default();
    debug!(?filter, %prefix, "listing location");

    let location = FileLocation::new(config);
    let files = match location.list_files_with_prefix(&prefix, filter) {
        Ok(files) => files,
        Err(e) => {
            eprintln!("Error: Failed to list files: {}", e);
            process::exit(1);
        }
    };

    for file in &files {
        match describe(file) {
            Ok(line) => println!("{}", line),
            Err(e) => eprintln!("  - {:?}", e),
        }
    }
    println!("{} files", files.len());
}

fn describe(file: &FileHandle<'_>) -> FilelocResult<String> {
    Ok(format!(
        "{}\t{}\t{}",
        file.basename()?,
        file.size()?,
        file.timestamp()?
    ))
}
