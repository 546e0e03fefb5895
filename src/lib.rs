pub mod domain {
    pub mod analysis;
    pub mod entities;
    pub mod history;
    pub mod ports;
    pub mod rules;
    pub mod value_objects;
}

pub mod application {
    pub mod config;
    pub mod services {
        pub mod monitor;
        pub mod session;
    }
}

pub mod infrastructure {
    pub mod collectors {
        pub mod disk_collector;
        pub mod procfs;
        pub mod sysinfo_collector;
    }
    pub mod export;
    pub mod persistence {
        pub mod in_memory_store;
        pub mod toml_store;
    }
    pub mod sinks {
        pub mod composite;
        pub mod console;
        pub mod log_file;
    }
}

pub mod presentation {
    pub mod cli {
        pub mod app;
        pub mod commands {
            pub mod config;
            pub mod export;
            pub mod monitor;
            pub mod scan;
            pub mod status;
            pub mod top;
            pub mod watch;
        }
        pub mod formatters {
            pub mod alert_fmt;
            pub mod status_fmt;
            pub mod table_fmt;
        }
    }
}
