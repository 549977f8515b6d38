pub mod in_memory;
pub mod supabase;

pub use in_memory::{
    InMemoryCallerScope, InMemoryPlatform, InMemoryPrivilegedScope, MemorySeed, PlatformCall,
    SeedIdentity,
};
pub use supabase::{SupabaseCallerScope, SupabaseConnector, SupabasePrivilegedScope};
