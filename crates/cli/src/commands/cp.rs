//! cp command - Copy objects
//!
//! Uploads a local file, downloads an object, or copies an object within a
//! container on the server side.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use clap::Args;
use md5::{Digest, Md5};
use serde::Serialize;
use swc_core::{ParsedPath, RemotePath, headers, parse_path};

use super::{connect, fail};
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig, ProgressBar, human_size};

/// Copy objects
#[derive(Args, Debug)]
pub struct CpArgs {
    /// Source path (local path or profile/container/object)
    pub source: String,

    /// Destination path (local path or profile/container[/object])
    pub target: String,

    /// Remove the uploaded object after this many seconds
    #[arg(long, conflicts_with = "expire_at")]
    pub expire_after: Option<u64>,

    /// Remove the uploaded object at this Unix timestamp
    #[arg(long)]
    pub expire_at: Option<u64>,

    /// Send the MD5 of the file so the service verifies the upload
    #[arg(long)]
    pub checksum: bool,

    /// Content type for uploaded files (guessed from the extension by default)
    #[arg(long)]
    pub content_type: Option<String>,
}

#[derive(Debug, Serialize)]
struct CpOutput {
    status: &'static str,
    source: String,
    target: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    size_bytes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    size_human: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    etag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cdn_url: Option<String>,
}

impl CpOutput {
    fn new(source: String, target: String, size: Option<u64>) -> Self {
        Self {
            status: "success",
            source,
            target,
            size_bytes: size,
            size_human: size.map(human_size),
            etag: None,
            cdn_url: None,
        }
    }
}

/// Execute the cp command
pub fn execute(args: CpArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let source = match parse_path(&args.source) {
        Ok(p) => p,
        Err(e) => return fail(&formatter, "Invalid source path", &e),
    };
    let target = match parse_path(&args.target) {
        Ok(p) => p,
        Err(e) => return fail(&formatter, "Invalid target path", &e),
    };

    match (&source, &target) {
        (ParsedPath::Local(src), ParsedPath::Remote(dst)) => upload(src, dst, &args, &formatter),
        (ParsedPath::Remote(src), ParsedPath::Local(dst)) => download(src, dst, &formatter),
        (ParsedPath::Remote(src), ParsedPath::Remote(dst)) => copy_remote(src, dst, &formatter),
        (ParsedPath::Local(_), ParsedPath::Local(_)) => {
            formatter.error("Cannot copy between two local paths. Use system cp command.");
            ExitCode::UsageError
        }
    }
}

/// Object name for a destination that may name a directory
fn destination_key(dst: &RemotePath, file_name: &str) -> String {
    if dst.is_dir {
        format!("{}{file_name}", dst.key)
    } else {
        dst.key.clone()
    }
}

/// Last segment of an object name
fn base_name(key: &str) -> &str {
    key.rsplit('/').next().unwrap_or(key)
}

/// Hex MD5 of a file, streamed in chunks
fn file_md5(path: &Path, progress: &ProgressBar) -> std::io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Md5::new();
    let mut buffer = vec![0u8; 64 * 1024];
    loop {
        let read = file.read(&mut buffer)?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
        progress.inc(read as u64);
    }
    Ok(hex::encode(hasher.finalize()))
}

fn upload_headers(src: &Path, args: &CpArgs, formatter: &Formatter) -> std::io::Result<Vec<(String, String)>> {
    let mut extra = Vec::new();

    if let Some(seconds) = args.expire_after {
        extra.push(headers::delete_after(seconds));
    }
    if let Some(timestamp) = args.expire_at {
        extra.push(headers::delete_at(timestamp));
    }

    let content_type = args.content_type.clone().or_else(|| {
        mime_guess::from_path(src)
            .first()
            .map(|m| m.essence_str().to_string())
    });
    if let Some(content_type) = content_type {
        extra.push(headers::content_type(content_type));
    }

    if args.checksum {
        let length = std::fs::metadata(src)?.len();
        let progress = ProgressBar::new(formatter.config(), length);
        let digest = file_md5(src, &progress);
        progress.finish_and_clear();
        extra.push(headers::etag(digest?));
    }

    Ok(extra)
}

fn upload(src: &Path, dst: &RemotePath, args: &CpArgs, formatter: &Formatter) -> ExitCode {
    if !src.exists() {
        formatter.error(&format!("Source not found: {}", src.display()));
        return ExitCode::NotFound;
    }
    if src.is_dir() {
        formatter.error("Source is a directory. Only single files can be uploaded.");
        return ExitCode::UsageError;
    }

    let file_name = src.file_name().unwrap_or_default().to_string_lossy();
    let key = destination_key(dst, &file_name);
    let target = RemotePath::new(&dst.profile, &dst.container, &key);
    let src_display = src.display().to_string();

    let extra = match upload_headers(src, args, formatter) {
        Ok(extra) => extra,
        Err(e) => return fail(formatter, &format!("Failed to read {src_display}"), &e.into()),
    };

    let connection = match connect(&dst.profile, formatter) {
        Ok(connection) => connection,
        Err(code) => return code,
    };
    let container = match connection.container(&dst.container) {
        Ok(container) => container,
        Err(e) => return fail(formatter, "Failed to open container", &e),
    };

    let spinner = ProgressBar::spinner(formatter.config(), &format!("Uploading {src_display}"));
    let result = container.upload(src, Some(&key), &extra);
    spinner.finish_and_clear();

    let uploaded = match result {
        Ok(uploaded) => uploaded,
        Err(e) => return fail(formatter, &format!("Failed to upload {src_display}"), &e),
    };

    let size = std::fs::metadata(src).map(|m| m.len()).ok();
    let mut output = CpOutput::new(src_display, target.to_string(), size);
    output.etag = uploaded.etag().map(str::to_string);
    output.cdn_url = uploaded.cdn_url;

    if formatter.is_json() {
        formatter.json(&output);
    } else {
        let size = output.size_human.clone().unwrap_or_default();
        formatter.println(&format!("{} -> {} ({size})", output.source, output.target));
        if let Some(url) = &output.cdn_url {
            formatter.println(&format!("CDN URL: {url}"));
        }
    }
    ExitCode::Success
}

fn download(src: &RemotePath, dst: &Path, formatter: &Formatter) -> ExitCode {
    if src.is_dir {
        formatter.error("Source must name an object.");
        return ExitCode::UsageError;
    }

    let target: PathBuf = if dst.is_dir() || dst.to_string_lossy().ends_with('/') {
        dst.join(base_name(&src.key))
    } else {
        dst.to_path_buf()
    };

    let connection = match connect(&src.profile, formatter) {
        Ok(connection) => connection,
        Err(code) => return code,
    };
    let container = match connection.container(&src.container) {
        Ok(container) => container,
        Err(e) => return fail(formatter, "Failed to open container", &e),
    };

    let spinner = ProgressBar::spinner(formatter.config(), &format!("Downloading {src}"));
    let result = container.download(&src.key);
    spinner.finish_and_clear();

    let content = match result {
        Ok(content) => content,
        Err(e) => return fail(formatter, &format!("Failed to download {src}"), &e),
    };

    if let Err(e) = std::fs::write(&target, &content) {
        return fail(formatter, &format!("Failed to write {}", target.display()), &e.into());
    }

    let output = CpOutput::new(src.to_string(), target.display().to_string(), Some(content.len() as u64));
    if formatter.is_json() {
        formatter.json(&output);
    } else {
        let size = output.size_human.clone().unwrap_or_default();
        formatter.println(&format!("{} -> {} ({size})", output.source, output.target));
    }
    ExitCode::Success
}

fn copy_remote(src: &RemotePath, dst: &RemotePath, formatter: &Formatter) -> ExitCode {
    if src.profile != dst.profile || src.container != dst.container {
        formatter.error("Server-side copy works within one container only.");
        return ExitCode::UsageError;
    }
    if src.is_dir {
        formatter.error("Source must name an object.");
        return ExitCode::UsageError;
    }

    let key = destination_key(dst, base_name(&src.key));
    let target = RemotePath::new(&dst.profile, &dst.container, &key);

    let connection = match connect(&src.profile, formatter) {
        Ok(connection) => connection,
        Err(code) => return code,
    };
    let container = match connection.container(&src.container) {
        Ok(container) => container,
        Err(e) => return fail(formatter, "Failed to open container", &e),
    };

    if let Err(e) = container.copy(&src.key, &key) {
        return fail(formatter, "Copy failed", &e);
    }

    let output = CpOutput::new(src.to_string(), target.to_string(), None);
    if formatter.is_json() {
        formatter.json(&output);
    } else {
        formatter.println(&format!("{} -> {}", output.source, output.target));
    }
    ExitCode::Success
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_destination_key() {
        let dir = RemotePath::new("s", "c", "");
        assert_eq!(destination_key(&dir, "a.txt"), "a.txt");

        let folder = RemotePath::new("s", "c", "docs/");
        assert_eq!(destination_key(&folder, "a.txt"), "docs/a.txt");

        let named = RemotePath::new("s", "c", "docs/b.txt");
        assert_eq!(destination_key(&named, "a.txt"), "docs/b.txt");
    }

    #[test]
    fn test_base_name() {
        assert_eq!(base_name("a/b/c.txt"), "c.txt");
        assert_eq!(base_name("c.txt"), "c.txt");
    }

    #[test]
    fn test_file_md5() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("hello.txt");
        std::fs::write(&path, "hello").unwrap();

        let progress = ProgressBar::new(
            &OutputConfig {
                no_progress: true,
                ..Default::default()
            },
            5,
        );
        assert_eq!(
            file_md5(&path, &progress).unwrap(),
            "5d41402abc4b2a76b9719d911017c592"
        );
    }

    #[test]
    fn test_upload_headers() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("page.html");
        std::fs::write(&path, "<p>hi</p>").unwrap();

        let args = CpArgs {
            source: String::new(),
            target: String::new(),
            expire_after: Some(60),
            expire_at: None,
            checksum: true,
            content_type: None,
        };
        let formatter = Formatter::new(OutputConfig {
            quiet: true,
            ..Default::default()
        });

        let extra = upload_headers(&path, &args, &formatter).unwrap();
        assert!(extra.contains(&("X-Delete-After".to_string(), "60".to_string())));
        assert!(extra.contains(&("Content-Type".to_string(), "text/html".to_string())));
        assert!(headers::contains(&extra, headers::ETAG));
    }
}
