//! Static descriptors for the Redis commands the router knows about.
//!
//! Key positions follow the arity rows Redis publishes through `COMMAND`:
//! 1-based over the full argv, negative last-key counting from the end.
//! Commands the cluster client refuses outright (administrative,
//! connection-scoped, transactional, cursor-based) are collected in the
//! default unsupported table.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use super::Command;

macro_rules! command_table {
    ($($name:ident => $descriptor:expr;)*) => {
        $(
            #[doc = concat!("Descriptor for `", stringify!($name), "`.")]
            pub static $name: Command = $descriptor;
        )*

        static ALL: &[&Command] = &[$(&$name,)*];
    };
}

command_table! {
    APPEND => Command::new("append", 1, 1, 1);
    ASKING => Command::new("asking", 0, 0, 0).keyless();
    AUTH => Command::new("auth", 0, 0, 0).keyless();
    BGREWRITEAOF => Command::new("bgrewriteaof", 0, 0, 0).keyless();
    BGSAVE => Command::new("bgsave", 0, 0, 0).keyless();
    CLIENT => Command::new("client", 0, 0, 0).keyless();
    CLUSTER => Command::new("cluster", 0, 0, 0).keyless();
    COMMAND => Command::new("command", 0, 0, 0).keyless();
    CONFIG => Command::new("config", 0, 0, 0).keyless();
    DBSIZE => Command::new("dbsize", 0, 0, 0).keyless().read_only();
    DEBUG => Command::new("debug", 0, 0, 0).keyless();
    DECR => Command::new("decr", 1, 1, 1);
    DECRBY => Command::new("decrby", 1, 1, 1);
    DEL => Command::new("del", 1, -1, 1).multi_key();
    DISCARD => Command::new("discard", 0, 0, 0).keyless();
    DUMP => Command::new("dump", 1, 1, 1).read_only();
    ECHO => Command::new("echo", 0, 0, 0).keyless().read_only();
    EVAL => Command::new("eval", 0, 0, 0).movable();
    EVALSHA => Command::new("evalsha", 0, 0, 0).movable();
    EXISTS => Command::new("exists", 1, -1, 1).multi_key().read_only();
    EXPIRE => Command::new("expire", 1, 1, 1);
    EXPIREAT => Command::new("expireat", 1, 1, 1);
    FLUSHALL => Command::new("flushall", 0, 0, 0).keyless();
    FLUSHDB => Command::new("flushdb", 0, 0, 0).keyless();
    GEORADIUS => Command::new("georadius", 1, 1, 1).movable();
    GEORADIUSBYMEMBER => Command::new("georadiusbymember", 1, 1, 1).movable();
    GET => Command::new("get", 1, 1, 1).read_only();
    GETDEL => Command::new("getdel", 1, 1, 1);
    GETRANGE => Command::new("getrange", 1, 1, 1).read_only();
    GETSET => Command::new("getset", 1, 1, 1);
    HDEL => Command::new("hdel", 1, 1, 1);
    HEXISTS => Command::new("hexists", 1, 1, 1).read_only();
    HGET => Command::new("hget", 1, 1, 1).read_only();
    HGETALL => Command::new("hgetall", 1, 1, 1).read_only();
    HINCRBY => Command::new("hincrby", 1, 1, 1);
    HKEYS => Command::new("hkeys", 1, 1, 1).read_only();
    HLEN => Command::new("hlen", 1, 1, 1).read_only();
    HMGET => Command::new("hmget", 1, 1, 1).read_only();
    HMSET => Command::new("hmset", 1, 1, 1);
    HOST => Command::new("host", 0, 0, 0).keyless();
    HSET => Command::new("hset", 1, 1, 1);
    HSETNX => Command::new("hsetnx", 1, 1, 1);
    HVALS => Command::new("hvals", 1, 1, 1).read_only();
    INCR => Command::new("incr", 1, 1, 1);
    INCRBY => Command::new("incrby", 1, 1, 1);
    INCRBYFLOAT => Command::new("incrbyfloat", 1, 1, 1);
    INFO => Command::new("info", 0, 0, 0).keyless().read_only();
    KEYS => Command::new("keys", 0, 0, 0).keyless().read_only();
    LASTSAVE => Command::new("lastsave", 0, 0, 0).keyless();
    LATENCY => Command::new("latency", 0, 0, 0).keyless();
    LINDEX => Command::new("lindex", 1, 1, 1).read_only();
    LLEN => Command::new("llen", 1, 1, 1).read_only();
    LPOP => Command::new("lpop", 1, 1, 1);
    LPUSH => Command::new("lpush", 1, 1, 1);
    LRANGE => Command::new("lrange", 1, 1, 1).read_only();
    LREM => Command::new("lrem", 1, 1, 1);
    LSET => Command::new("lset", 1, 1, 1);
    LTRIM => Command::new("ltrim", 1, 1, 1);
    MEMORY => Command::new("memory", 0, 0, 0).keyless();
    MGET => Command::new("mget", 1, -1, 1).multi_key().read_only();
    MODULE => Command::new("module", 0, 0, 0).keyless();
    MONITOR => Command::new("monitor", 0, 0, 0).keyless();
    MSET => Command::new("mset", 1, -1, 2).multi_key();
    MSETNX => Command::new("msetnx", 1, -1, 2).multi_key();
    PERSIST => Command::new("persist", 1, 1, 1);
    PEXPIRE => Command::new("pexpire", 1, 1, 1);
    PEXPIREAT => Command::new("pexpireat", 1, 1, 1);
    PING => Command::new("ping", 0, 0, 0).keyless().read_only();
    PSETEX => Command::new("psetex", 1, 1, 1);
    PSUBSCRIBE => Command::new("psubscribe", 0, 0, 0).keyless();
    PTTL => Command::new("pttl", 1, 1, 1).read_only();
    PUBLISH => Command::new("publish", 0, 0, 0).keyless();
    PUNSUBSCRIBE => Command::new("punsubscribe", 0, 0, 0).keyless();
    READONLY => Command::new("readonly", 0, 0, 0).keyless();
    READWRITE => Command::new("readwrite", 0, 0, 0).keyless();
    RENAME => Command::new("rename", 1, 2, 1).multi_key();
    RENAMENX => Command::new("renamenx", 1, 2, 1).multi_key();
    REPLICAOF => Command::new("replicaof", 0, 0, 0).keyless();
    ROLE => Command::new("role", 0, 0, 0).keyless().read_only();
    SADD => Command::new("sadd", 1, 1, 1);
    SAVE => Command::new("save", 0, 0, 0).keyless();
    SCAN => Command::new("scan", 0, 0, 0).keyless().read_only();
    SCARD => Command::new("scard", 1, 1, 1).read_only();
    SCRIPT => Command::new("script", 0, 0, 0).keyless();
    SDIFF => Command::new("sdiff", 1, -1, 1).multi_key().read_only();
    SDIFFSTORE => Command::new("sdiffstore", 1, -1, 1).multi_key();
    SELECT => Command::new("select", 0, 0, 0).keyless();
    SENTINEL => Command::new("sentinel", 0, 0, 0).keyless();
    SET => Command::new("set", 1, 1, 1);
    SETEX => Command::new("setex", 1, 1, 1);
    SETNX => Command::new("setnx", 1, 1, 1);
    SETRANGE => Command::new("setrange", 1, 1, 1);
    SHUTDOWN => Command::new("shutdown", 0, 0, 0).keyless();
    SINTER => Command::new("sinter", 1, -1, 1).multi_key().read_only();
    SINTERSTORE => Command::new("sinterstore", 1, -1, 1).multi_key();
    SISMEMBER => Command::new("sismember", 1, 1, 1).read_only();
    SLAVEOF => Command::new("slaveof", 0, 0, 0).keyless();
    SLOWLOG => Command::new("slowlog", 0, 0, 0).keyless();
    SMEMBERS => Command::new("smembers", 1, 1, 1).read_only();
    SMOVE => Command::new("smove", 1, 2, 1).multi_key();
    SORT => Command::new("sort", 1, 1, 1).movable();
    SPOP => Command::new("spop", 1, 1, 1);
    SRANDMEMBER => Command::new("srandmember", 1, 1, 1).read_only();
    SREM => Command::new("srem", 1, 1, 1);
    STRLEN => Command::new("strlen", 1, 1, 1).read_only();
    SUBSCRIBE => Command::new("subscribe", 0, 0, 0).keyless();
    SUNION => Command::new("sunion", 1, -1, 1).multi_key().read_only();
    SUNIONSTORE => Command::new("sunionstore", 1, -1, 1).multi_key();
    SWAPDB => Command::new("swapdb", 0, 0, 0).keyless();
    SYNC => Command::new("sync", 0, 0, 0).keyless();
    TOUCH => Command::new("touch", 1, -1, 1).multi_key();
    TTL => Command::new("ttl", 1, 1, 1).read_only();
    TYPE => Command::new("type", 1, 1, 1).read_only();
    UNLINK => Command::new("unlink", 1, -1, 1).multi_key();
    UNSUBSCRIBE => Command::new("unsubscribe", 0, 0, 0).keyless();
    XADD => Command::new("xadd", 1, 1, 1);
    XLEN => Command::new("xlen", 1, 1, 1).read_only();
    XRANGE => Command::new("xrange", 1, 1, 1).read_only();
    XREAD => Command::new("xread", 1, 1, 1).movable().read_only();
    XREADGROUP => Command::new("xreadgroup", 1, 1, 1).movable();
    ZADD => Command::new("zadd", 1, 1, 1);
    ZCARD => Command::new("zcard", 1, 1, 1).read_only();
    ZCOUNT => Command::new("zcount", 1, 1, 1).read_only();
    ZINCRBY => Command::new("zincrby", 1, 1, 1);
    ZINTERSTORE => Command::new("zinterstore", 0, 0, 0).movable();
    ZRANGE => Command::new("zrange", 1, 1, 1).read_only();
    ZRANK => Command::new("zrank", 1, 1, 1).read_only();
    ZREM => Command::new("zrem", 1, 1, 1);
    ZSCORE => Command::new("zscore", 1, 1, 1).read_only();
    ZUNIONSTORE => Command::new("zunionstore", 0, 0, 0).movable();
}

static INDEX: Lazy<HashMap<&'static str, &'static Command>> =
    Lazy::new(|| ALL.iter().map(|cmd| (cmd.name(), *cmd)).collect());

/// Looks up a descriptor by wire name, case-insensitively.
pub fn lookup(name: &str) -> Option<&'static Command> {
    INDEX.get(name.to_ascii_lowercase().as_str()).copied()
}

/// Commands the cluster router refuses with the default message:
/// administrative, connection-scoped, transactional, pub/sub-state, and
/// cursor-based commands whose semantics do not survive sharding.
static UNSUPPORTED: &[&Command] = &[
    &ASKING,
    &AUTH,
    &BGREWRITEAOF,
    &BGSAVE,
    &CLIENT,
    &CLUSTER,
    &COMMAND,
    &CONFIG,
    &DEBUG,
    &DISCARD,
    &HOST,
    &INFO,
    &LASTSAVE,
    &LATENCY,
    &MEMORY,
    &MODULE,
    &MONITOR,
    &PING,
    &PSUBSCRIBE,
    &PUNSUBSCRIBE,
    &READONLY,
    &READWRITE,
    &REPLICAOF,
    &ROLE,
    &SAVE,
    &SCAN,
    &SCRIPT,
    &SELECT,
    &SENTINEL,
    &SHUTDOWN,
    &SLAVEOF,
    &SLOWLOG,
    &SUBSCRIBE,
    &SWAPDB,
    &SYNC,
    &UNSUBSCRIBE,
];

/// The default rejection message for a command the cluster client refuses.
pub(crate) fn default_unsupported_message(command: &Command) -> String {
    format!(
        "cluster client does not handle command {}, use a single-node client on the right node",
        command.name()
    )
}

/// Builds the default unsupported-command table.
pub(crate) fn default_unsupported() -> HashMap<&'static str, String> {
    let mut table: HashMap<&'static str, String> = UNSUPPORTED
        .iter()
        .map(|cmd| (cmd.name(), default_unsupported_message(cmd)))
        .collect();
    table.insert(
        FLUSHALL.name(),
        "cluster client does not handle command flushall, use flushdb".to_string(),
    );
    table
}
