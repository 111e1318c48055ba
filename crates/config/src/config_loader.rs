/*
 * Copyright 2024 Fluence Labs Limited
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

use std::path::Path;

use config::Config;
use config::Environment;
use config::File;
use config::FileFormat;
use eyre::Context;

use crate::unresolved_config::UnresolvedCoreFreqConfig;
use crate::CoreFreqConfig;

/// Loads the board TOML at `path` and resolves it. `COREFREQ_*`
/// environment variables override the file.
pub fn load_config(path: impl AsRef<Path>) -> eyre::Result<CoreFreqConfig> {
    let path = path.as_ref();
    let unresolved: UnresolvedCoreFreqConfig = Config::builder()
        .add_source(File::from(path).format(FileFormat::Toml).required(true))
        .add_source(Environment::with_prefix("COREFREQ").separator("_"))
        .build()
        .and_then(Config::try_deserialize)
        .with_context(|| format!("failed to load config from {}", path.display()))?;

    Ok(unresolved.resolve())
}
