// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod domain_throttle;
pub mod ftp_handler;
pub mod ftp_probe;
pub mod http_probe;
pub mod router;
pub mod storage_url;
pub mod traits;
