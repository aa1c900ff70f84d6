//! Command family taxonomy
//!
//! Low-level commands are counted in named groups matching the sizing
//! report's columns. The order here is the report's column order.

/// A named group of commands counted together
#[derive(Debug, Clone, Copy)]
pub struct CommandFamily {
    /// Report column name
    pub name: &'static str,
    /// Commands whose call counters feed this family
    pub commands: &'static [&'static str],
}

/// The fixed taxonomy, in report column order
pub const COMMAND_FAMILIES: &[CommandFamily] = &[
    CommandFamily {
        name: "HashBasedCmds",
        commands: &["hget", "hset", "hgetall", "hmget", "hsetnx"],
    },
    CommandFamily {
        name: "HyperLogLogBasedCmds",
        commands: &["pfadd", "pfcount", "pfmerge"],
    },
    CommandFamily {
        name: "KeyBasedCmds",
        commands: &["del", "expire", "unlink"],
    },
    CommandFamily {
        name: "ListBasedCmds",
        commands: &[
            "blpop",
            "brpop",
            "brpoplpush",
            "blmove",
            "linsert",
            "llen",
            "lpop",
            "lpush",
            "lpushx",
            "lrange",
            "lset",
            "lrem",
            "rpop",
            "rpoplpush",
            "rpush",
            "rpushx",
        ],
    },
    CommandFamily {
        name: "SetBasedCmds",
        commands: &[
            "sadd",
            "scard",
            "sdiff",
            "sdiffstore",
            "sinter",
            "sinterstore",
            "sismember",
            "smismember",
            "smembers",
            "smove",
            "spop",
            "srandmember",
            "srem",
            "sunion",
            "sunionstore",
            "sscan",
        ],
    },
    CommandFamily {
        name: "SortedSetBasedCmds",
        commands: &[
            "bzpopmin",
            "bzpopmax",
            "zadd",
            "zcard",
            "zcount",
            "zdiff",
            "zdiffstore",
            "zincrby",
            "zinter",
            "zinterstore",
            "zlexcount",
            "zpopmax",
            "zpopmin",
            "zrange",
            "zrangebylex",
            "zrevrangebylex",
            "zrangebyscore",
            "zrank",
            "zrem",
            "zremrangebylex",
            "zremrangebyrank",
            "zremrangebyscore",
            "zrevrange",
            "zrevrangebyscore",
            "zrevrank",
            "zscore",
            "zunion",
            "zmscore",
            "zunionstore",
            "zscan",
        ],
    },
    CommandFamily {
        name: "StringBasedCmds",
        commands: &["get", "set", "incr", "decr", "incrby", "decrby"],
    },
    CommandFamily {
        name: "StreamBasedCmds",
        commands: &[
            "xadd",
            "xtrim",
            "xdel",
            "xrange",
            "xrevrange",
            "xlen",
            "xread",
            "xgroup",
            "xreadgroup",
            "xack",
            "xclaim",
            "xpending",
        ],
    },
];

/// Index of a family by report column name
pub fn family_index(name: &str) -> Option<usize> {
    COMMAND_FAMILIES.iter().position(|f| f.name == name)
}
