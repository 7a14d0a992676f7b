//! Portable `.inkp` project bundles: a tar.zst archive with the project record and its images.

use std::{
    fs::{self, File},
    io::Read,
    path::Path,
};

use anyhow::Context;
use tar::{Archive, Builder, Header};
use zstd::stream::{read::Decoder as ZstdDecoder, write::Encoder as ZstdEncoder};

use crate::core::data_uri::DataUri;
use crate::models::Project;

const PROJECT_ENTRY: &str = "project.json";
const DESIGN_ENTRY: &str = "design.png";
const STENCIL_ENTRY: &str = "stencil.png";

fn append_file<W: std::io::Write>(tar: &mut Builder<W>, name: &str, data: &[u8]) -> anyhow::Result<()> {
    let mut header = Header::new_gnu();
    header.set_size(data.len() as u64);
    header.set_mode(0o644);
    header.set_cksum();
    tar.append_data(&mut header, name, data)
        .with_context(|| format!("Failed to add {name} to bundle"))?;
    Ok(())
}

/// Write the project to `dest` as a tar.zst bundle.
///
/// Images are stored as PNG files next to `project.json`; the JSON keeps the data URIs too so the
/// record imports unchanged.
pub fn export_bundle(project: &Project, dest: &Path) -> anyhow::Result<()> {
    if let Some(parent) = dest.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let out = File::create(dest).with_context(|| format!("Failed to create bundle {:?}", dest))?;
    let encoder = ZstdEncoder::new(out, 3)
        .with_context(|| format!("Failed to create zstd encoder for {:?}", dest))?;
    let mut tar = Builder::new(encoder);

    let json = serde_json::to_vec_pretty(project)?;
    append_file(&mut tar, PROJECT_ENTRY, &json)?;

    let design = DataUri::parse(&project.design)?.decode_image()?;
    append_file(&mut tar, DESIGN_ENTRY, &DataUri::from_image(&design)?.bytes)?;

    if let Some(stencil) = &project.stencil {
        let stencil = DataUri::parse(stencil)?.decode_image()?;
        append_file(&mut tar, STENCIL_ENTRY, &DataUri::from_image(&stencil)?.bytes)?;
    }

    let encoder = tar
        .into_inner()
        .with_context(|| format!("Failed to finalize tar for {:?}", dest))?;
    encoder
        .finish()
        .with_context(|| format!("Failed to finalize zstd stream for {:?}", dest))?;
    Ok(())
}

/// Read the project record back out of a bundle written by [`export_bundle`].
pub fn import_bundle(src: &Path) -> anyhow::Result<Project> {
    let f = File::open(src).with_context(|| format!("Failed to open bundle {:?}", src))?;
    let decoder = ZstdDecoder::new(f).with_context(|| format!("Invalid zstd stream in {:?}", src))?;
    let mut archive = Archive::new(decoder);

    for entry in archive.entries()? {
        let mut entry = entry?;
        let is_project = entry
            .path()?
            .file_name()
            .is_some_and(|name| name == PROJECT_ENTRY);
        if is_project {
            let mut json = Vec::new();
            entry.read_to_end(&mut json)?;
            let project: Project = serde_json::from_slice(&json)
                .with_context(|| format!("Corrupt project record in {:?}", src))?;
            return Ok(project);
        }
    }
    anyhow::bail!("Bundle {:?} has no {PROJECT_ENTRY}", src)
}
