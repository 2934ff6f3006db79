//! End-to-end scenarios for the enumeration engine. Sources and resolvers
//! are replaced with in-memory fakes, so nothing here touches the network.

#[cfg(test)]
mod enumeration;
