// -------------------------------------------------------------------------------------------------
//  Copyright (C) 2015-2026 Nautech Systems Pty Ltd. All rights reserved.
//  https://nautechsystems.io
//
//  Licensed under the GNU Lesser General Public License Version 3.0 (the "License");
//  You may not use this file except in compliance with the License.
//  You may obtain a copy of the License at https://www.gnu.org/licenses/lgpl-3.0.en.html
//
//  Unless required by applicable law or agreed to in writing, software
//  distributed under the License is distributed on an "AS IS" BASIS,
//  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//  See the License for the specific language governing permissions and
//  limitations under the License.
// -------------------------------------------------------------------------------------------------

use std::{hint::black_box, sync::Arc};

use courier_routing::{
    Address, AddressManager, AddressMap, WildcardScheme,
    stubs::{StubBinding, StubBindingSetFactory},
};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

struct QueryCase {
    name: &'static str,
    query: &'static str,
}

const QUERIES: &[QueryCase] = &[
    QueryCase {
        name: "exact",
        query: "data.quotes.BINANCE.ETHUSDT",
    },
    QueryCase {
        name: "star_end",
        query: "data.quotes.BINANCE.*",
    },
    QueryCase {
        name: "star_middle",
        query: "data.*.BINANCE.ETHUSDT",
    },
    QueryCase {
        name: "multi_star",
        query: "data.*.BINANCE.*",
    },
    QueryCase {
        name: "hash_end",
        query: "data.quotes.#",
    },
    QueryCase {
        name: "hash_middle",
        query: "data.#.ETHUSDT",
    },
    QueryCase {
        name: "no_match",
        query: "order.*.BYBIT.*",
    },
];

fn populated_map() -> AddressMap<Address> {
    let map = AddressMap::new(WildcardScheme::default());
    for venue in ["BINANCE", "BYBIT", "COINBASE", "KRAKEN"] {
        for symbol in ["ETHUSDT", "BTCUSDT", "SOLUSDT", "ADAUSDT", "XRPUSDT"] {
            for kind in ["quotes", "trades", "depth"] {
                let address = Address::from(format!("data.{kind}.{venue}.{symbol}").as_str());
                map.put(address, address).unwrap();
            }
        }
    }
    map.put(Address::from("data.quotes.#"), Address::from("data.quotes.#"))
        .unwrap();
    map.put(Address::from("data.*.BINANCE.*"), Address::from("data.*.BINANCE.*"))
        .unwrap();
    map
}

fn bench_visit_matching(c: &mut Criterion) {
    let mut group = c.benchmark_group("visit_matching");
    let map = populated_map();

    for case in QUERIES {
        group.bench_with_input(BenchmarkId::new("trie", case.name), &case, |b, case| {
            let query = Address::from(case.query);
            b.iter(|| {
                let mut count = 0usize;
                map.visit_matching(query, &mut |_| {
                    count += 1;
                    Ok(())
                })
                .unwrap();
                black_box(count)
            });
        });
    }

    group.finish();
}

fn bench_put_remove(c: &mut Criterion) {
    let address = Address::from("data.quotes.BINANCE.ETHUSDT");

    c.bench_function("put_remove", |b| {
        let map: AddressMap<Address> = AddressMap::new(WildcardScheme::default());
        b.iter(|| {
            map.put(address, address).unwrap();
            black_box(map.remove(address, &address).unwrap())
        });
    });
}

fn bench_routing_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("routing_lookup");

    let manager = AddressManager::new(
        WildcardScheme::default(),
        Box::new(StubBindingSetFactory::default()),
    );
    manager
        .add_binding(Arc::new(StubBinding::new(
            Address::from("data.quotes.#"),
            "quotes-consumer",
        )))
        .unwrap();
    let address = Address::from("data.quotes.BINANCE.ETHUSDT");
    // first lookup materializes, the bench measures the cached path
    manager.get_bindings_for_routing_address(address).unwrap();

    group.bench_function("materialized", |b| {
        b.iter(|| black_box(manager.get_bindings_for_routing_address(address).unwrap()));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_visit_matching,
    bench_put_remove,
    bench_routing_lookup
);
criterion_main!(benches);
