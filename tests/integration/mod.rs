// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.


mod hook_test;
mod host_overlap_test;
mod link_check_worker_test;
mod registry_client_test;
