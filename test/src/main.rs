use std::error::Error;

use multipart_form::{
    external::dotenv::dotenv, parse_boundary, Options, StreamMultipart, UploadStore,
};

// Decodes a captured multipart body and stores its files.
//
//     test <body-file> <content-type | boundary>
#[tokio::main]
async fn main() {
    dotenv().ok();

    let mut args = std::env::args().skip(1);
    let (Some(path), Some(content_type)) = (args.next(), args.next()) else {
        eprintln!("usage: test <body-file> <content-type | boundary>");
        std::process::exit(2);
    };

    if let Err(e) = run(&path, &content_type).await {
        eprintln!("failed to decode {}: {}", path, e);
        std::process::exit(1);
    }
}

async fn run(path: &str, content_type: &str) -> Result<(), Box<dyn Error>> {
    let options = Options::new();
    let boundary = if content_type.contains('/') {
        parse_boundary(content_type)?
    } else {
        content_type.to_string()
    };

    let mut file = tokio::fs::File::open(path).await?;
    let form = file.read_multipart(&boundary, &options).await?;
    println!("{}", serde_json::to_string_pretty(&form.to_json())?);

    let store = UploadStore::from_options(&options);
    for stored in store.save_all(&form).await? {
        println!("stored: {}", serde_json::to_string(&stored)?);
    }
    Ok(())
}
