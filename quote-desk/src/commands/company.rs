use super::split_assignment;
use crate::error::AppError;
use crate::models::CompanyField;
use crate::AppState;
use std::path::Path;

pub async fn show(state: &AppState) -> Result<(), AppError> {
    let profile = state.company.get().await?;
    let json = serde_json::to_string_pretty(&profile)?;
    println!("{}", json);
    Ok(())
}

pub async fn set(state: &AppState, fields: &[String]) -> Result<(), AppError> {
    let edits = fields
        .iter()
        .map(|raw| {
            let (key, value) = split_assignment(raw)?;
            CompanyField::from_key(key, value)
                .ok_or_else(|| AppError::BadInput(format!("Unknown company field '{}'", key)))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut profile = state.company.get().await?;
    for edit in edits {
        profile.apply(edit);
    }
    let saved = state.company.update(&profile).await?;
    println!("Company profile saved ({})", saved.name_en);
    Ok(())
}

pub async fn logo(state: &AppState, path: &Path) -> Result<(), AppError> {
    let upload = state.company.upload_logo_file(path).await?;
    println!("Logo uploaded: {}", upload.logo_path);
    Ok(())
}
